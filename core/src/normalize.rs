use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    // The generator's English stopword set; these words never reach the
    // term table, so looking them up is pointless.
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
            "it", "near", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then",
            "there", "these", "they", "this", "to", "was", "will", "with",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Fold a user-entered word into the form the term table stores: NFKC
/// normalization, lowercase, first word token, stopword drop, stemming.
/// Returns `None` for input the generator would not have indexed.
pub fn normalize_term(raw: &str) -> Option<String> {
    let folded = raw.nfkc().collect::<String>().to_lowercase();
    let token = WORD.find(&folded)?.as_str();
    if is_stopword(token) {
        return None;
    }
    Some(STEMMER.stem(token).to_string())
}
