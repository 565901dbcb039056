use crate::SearchIndex;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

lazy_static! {
    // The generator wraps the payload in a loader call so browsers can
    // pull it in as a plain <script>.
    static ref WRAPPER: Regex =
        Regex::new(r"(?s)^\s*Search\.setIndex\((.*)\)\s*;?\s*$").expect("valid regex");
}

/// Load a search index file, accepting either the `Search.setIndex({...})`
/// wrapper the generator emits or a bare JSON object.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<SearchIndex> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading search index {}", path.display()))?;
    load_index_str(&raw).with_context(|| format!("parsing search index {}", path.display()))
}

pub fn load_index_str(raw: &str) -> Result<SearchIndex> {
    let payload = match WRAPPER.captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    };
    let index: SearchIndex =
        serde_json::from_str(payload.trim()).context("decoding search index object")?;
    tracing::debug!(
        num_docs = index.num_docs(),
        num_terms = index.terms.len(),
        "loaded search index"
    );
    Ok(index)
}

/// Serialize an index, optionally re-wrapped in the loader call.
pub fn index_to_string(index: &SearchIndex, wrap: bool, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(index)?
    } else {
        serde_json::to_string(index)?
    };
    Ok(if wrap {
        format!("Search.setIndex({json})")
    } else {
        json
    })
}

pub fn save_index<P: AsRef<Path>>(path: P, index: &SearchIndex, wrap: bool) -> Result<()> {
    let path = path.as_ref();
    let out = index_to_string(index, wrap, false)?;
    fs::write(path, out).with_context(|| format!("writing search index {}", path.display()))?;
    Ok(())
}
