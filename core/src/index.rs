use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub type DocId = u32;

/// One generated search index file: the object the documentation build
/// emits for its client-side search widget. `titles` and `docurls` are
/// parallel arrays indexed by [`DocId`]; everything else refers into them.
///
/// Fields are kept in the generator's (alphabetical) key order so a
/// re-serialized index matches the emitted layout; the term maps are
/// `BTreeMap` for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Display title -> occurrences as `[doc_id, anchor|null]` pairs.
    pub alltitles: BTreeMap<String, Vec<DocAnchor>>,
    /// Relative page URL per document.
    pub docurls: Vec<String>,
    /// Generator extension -> schema version.
    pub envversion: BTreeMap<String, u32>,
    /// Index entry -> occurrences as `[doc_id, anchor]` pairs.
    pub indexentries: BTreeMap<String, Vec<DocAnchor>>,
    /// Name prefix -> object records.
    pub objects: BTreeMap<String, Vec<ObjectEntry>>,
    /// Object type index -> `[domain, role, display name]`.
    pub objnames: BTreeMap<String, ObjectName>,
    /// Object type index -> `"domain:role"`.
    pub objtypes: BTreeMap<String, String>,
    /// Term -> documents containing it.
    pub terms: BTreeMap<String, Postings>,
    /// Document title per document.
    pub titles: Vec<String>,
    /// Term -> documents whose title contains it.
    pub titleterms: BTreeMap<String, Postings>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_docs(&self) -> usize {
        self.titles.len()
    }

    /// Resolve a document id against the parallel title/URL tables.
    pub fn doc(&self, doc_id: DocId) -> Option<DocRef> {
        let title = self.titles.get(doc_id as usize)?;
        let url = self.docurls.get(doc_id as usize)?;
        Some(DocRef {
            doc_id,
            title: title.clone(),
            url: url.clone(),
        })
    }

    pub fn docs(&self) -> impl Iterator<Item = DocRef> + '_ {
        (0..self.num_docs() as DocId).filter_map(move |id| self.doc(id))
    }
}

/// A document resolved to its title and page URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocRef {
    pub doc_id: DocId,
    pub title: String,
    pub url: String,
}

/// `[doc_id, anchor]` pair; the anchor is `null` for whole-page entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocAnchor(pub DocId, pub Option<String>);

impl DocAnchor {
    pub fn doc_id(&self) -> DocId {
        self.0
    }

    pub fn anchor(&self) -> Option<&str> {
        self.1.as_deref()
    }
}

/// One object record: `[doc_id, objtype index, priority, anchor, display name]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry(pub DocId, pub u32, pub i32, pub String, pub String);

impl ObjectEntry {
    pub fn doc_id(&self) -> DocId {
        self.0
    }

    pub fn type_index(&self) -> u32 {
        self.1
    }

    pub fn priority(&self) -> i32 {
        self.2
    }

    pub fn anchor(&self) -> &str {
        &self.3
    }

    pub fn name(&self) -> &str {
        &self.4
    }
}

/// `[domain, role, display name]` triple describing an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectName(pub String, pub String, pub String);

impl ObjectName {
    pub fn domain(&self) -> &str {
        &self.0
    }

    pub fn role(&self) -> &str {
        &self.1
    }

    pub fn display(&self) -> &str {
        &self.2
    }
}

/// Posting list for one term. The generator encodes a term occurring in a
/// single document as a bare id and anything else as an array; both decode
/// here, and singletons re-encode as bare ids so a round trip preserves
/// the emitted layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postings(pub Vec<DocId>);

impl Postings {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.0
    }
}

impl From<Vec<DocId>> for Postings {
    fn from(docs: Vec<DocId>) -> Self {
        Postings(docs)
    }
}

impl Serialize for Postings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => serializer.serialize_u32(*single),
            many => {
                let mut seq = serializer.serialize_seq(Some(many.len()))?;
                for doc_id in many {
                    seq.serialize_element(doc_id)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Postings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PostingsVisitor;

        impl<'de> Visitor<'de> for PostingsVisitor {
            type Value = Postings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a document id or an array of document ids")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Postings, E> {
                let doc_id = DocId::try_from(v)
                    .map_err(|_| E::custom(format!("document id {v} out of range")))?;
                Ok(Postings(vec![doc_id]))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Postings, E> {
                let doc_id = DocId::try_from(v)
                    .map_err(|_| E::custom(format!("document id {v} out of range")))?;
                Ok(Postings(vec![doc_id]))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Postings, A::Error> {
                let mut docs = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(doc_id) = seq.next_element::<DocId>()? {
                    docs.push(doc_id);
                }
                Ok(Postings(docs))
            }
        }

        deserializer.deserialize_any(PostingsVisitor)
    }
}
