use crate::index::{DocId, SearchIndex};
use crate::normalize::normalize_term;
use serde::Serialize;
use std::collections::BTreeMap;

/// A document matched by a term probe. `in_title` marks hits coming from
/// the title-term table; the caller decides what to make of that, this
/// crate does no scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermHit {
    pub doc_id: DocId,
    pub title: String,
    pub url: String,
    pub in_title: bool,
}

/// An object reference resolved to its page location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectHit {
    pub name: String,
    pub prefix: String,
    pub type_name: String,
    pub doc_id: DocId,
    pub url: String,
}

/// A title-table entry matched by a substring scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleHit {
    pub title: String,
    pub doc_id: DocId,
    pub url: String,
    pub anchor: Option<String>,
}

/// Look up a user-entered word. The stemmed form is probed first, then the
/// word verbatim: the generator stores mixed-case and numeric tokens
/// unstemmed, so the second probe is what finds those. Hits come back in
/// ascending document order.
pub fn lookup_term(index: &SearchIndex, raw: &str) -> Vec<TermHit> {
    let mut keys: Vec<String> = Vec::new();
    if let Some(stem) = normalize_term(raw) {
        keys.push(stem);
    }
    let verbatim = raw.trim();
    if !verbatim.is_empty() && keys.iter().all(|k| k != verbatim) {
        keys.push(verbatim.to_string());
    }
    probe(index, &keys)
}

/// Look up an already-normalized term with no folding applied.
pub fn lookup_exact(index: &SearchIndex, term: &str) -> Vec<TermHit> {
    probe(index, &[term.to_string()])
}

fn probe(index: &SearchIndex, keys: &[String]) -> Vec<TermHit> {
    // doc id -> seen in titleterms
    let mut merged: BTreeMap<DocId, bool> = BTreeMap::new();
    for key in keys {
        if let Some(postings) = index.terms.get(key) {
            for doc_id in postings.iter() {
                merged.entry(doc_id).or_insert(false);
            }
        }
        if let Some(postings) = index.titleterms.get(key) {
            for doc_id in postings.iter() {
                *merged.entry(doc_id).or_insert(true) = true;
            }
        }
    }
    merged
        .into_iter()
        .filter_map(|(doc_id, in_title)| {
            index.doc(doc_id).map(|d| TermHit {
                doc_id,
                title: d.title,
                url: d.url,
                in_title,
            })
        })
        .collect()
}

/// Find object records whose display name matches `name`, either bare or
/// qualified by their prefix.
pub fn lookup_object(index: &SearchIndex, name: &str) -> Vec<ObjectHit> {
    let mut hits = Vec::new();
    for (prefix, entries) in &index.objects {
        for entry in entries {
            let qualified = if prefix.is_empty() {
                entry.name().to_string()
            } else {
                format!("{prefix}.{}", entry.name())
            };
            if entry.name() != name && qualified != name {
                continue;
            }
            let Some(doc) = index.doc(entry.doc_id()) else {
                continue;
            };
            let type_name = index
                .objnames
                .get(&entry.type_index().to_string())
                .map(|n| n.display().to_string())
                .unwrap_or_default();
            let url = if entry.anchor().is_empty() {
                doc.url
            } else {
                format!("{}#{}", doc.url, entry.anchor())
            };
            hits.push(ObjectHit {
                name: qualified,
                prefix: prefix.clone(),
                type_name,
                doc_id: entry.doc_id(),
                url,
            });
        }
    }
    hits
}

/// Scan the title table for entries containing `needle`, case-folded.
pub fn titles_containing(index: &SearchIndex, needle: &str) -> Vec<TitleHit> {
    let needle = needle.to_lowercase();
    let mut hits = Vec::new();
    for (title, anchors) in &index.alltitles {
        if !title.to_lowercase().contains(&needle) {
            continue;
        }
        for anchor in anchors {
            let Some(doc) = index.doc(anchor.doc_id()) else {
                continue;
            };
            hits.push(TitleHit {
                title: title.clone(),
                doc_id: anchor.doc_id(),
                url: match anchor.anchor() {
                    Some(a) => format!("{}#{a}", doc.url),
                    None => doc.url,
                },
                anchor: anchor.anchor().map(str::to_string),
            });
        }
    }
    hits
}
