use crate::index::{DocId, Postings, SearchIndex};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single structural defect found in an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// A posting refers to a document id with no title/URL entry.
    DanglingDocId {
        section: &'static str,
        key: String,
        doc_id: DocId,
    },
    /// The parallel title and URL tables disagree in length.
    TitleUrlMismatch { titles: usize, docurls: usize },
    /// An object record's type index resolves in neither type table.
    UnknownObjectType {
        prefix: String,
        name: String,
        type_index: u32,
    },
    /// `objtypes` and `objnames` do not describe the same type indices.
    ObjectTableMismatch {
        only_in_objtypes: Vec<String>,
        only_in_objnames: Vec<String>,
    },
    /// Postings are not strictly ascending (out of order or duplicated).
    UnsortedPostings { section: &'static str, key: String },
    /// A term map contains an empty string key.
    EmptyTerm { section: &'static str },
    /// A term maps to no documents at all.
    EmptyPostings { section: &'static str, key: String },
    /// The generator metadata table is empty.
    EmptyEnvVersion,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::DanglingDocId { .. }
            | IssueKind::TitleUrlMismatch { .. }
            | IssueKind::UnknownObjectType { .. }
            | IssueKind::ObjectTableMismatch { .. } => Severity::Error,
            IssueKind::UnsortedPostings { .. }
            | IssueKind::EmptyTerm { .. }
            | IssueKind::EmptyPostings { .. }
            | IssueKind::EmptyEnvVersion => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IssueKind::DanglingDocId {
                section,
                key,
                doc_id,
            } => write!(f, "{section}[{key:?}] refers to unknown document {doc_id}"),
            IssueKind::TitleUrlMismatch { titles, docurls } => write!(
                f,
                "titles has {titles} entries but docurls has {docurls}"
            ),
            IssueKind::UnknownObjectType {
                prefix,
                name,
                type_index,
            } => write!(
                f,
                "object {prefix:?}/{name:?} uses unknown type index {type_index}"
            ),
            IssueKind::ObjectTableMismatch {
                only_in_objtypes,
                only_in_objnames,
            } => write!(
                f,
                "objtypes/objnames disagree (only in objtypes: {only_in_objtypes:?}, only in objnames: {only_in_objnames:?})"
            ),
            IssueKind::UnsortedPostings { section, key } => {
                write!(f, "{section}[{key:?}] postings are not strictly ascending")
            }
            IssueKind::EmptyTerm { section } => write!(f, "{section} contains an empty term"),
            IssueKind::EmptyPostings { section, key } => {
                write!(f, "{section}[{key:?}] has no postings")
            }
            IssueKind::EmptyEnvVersion => f.write_str("envversion is empty"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.kind)
    }
}

/// Outcome of the build consistency check. Findings are data; the check
/// itself cannot fail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn push(&mut self, kind: IssueKind) {
        self.issues.push(Issue {
            severity: kind.severity(),
            kind,
        });
    }

    pub fn is_well_formed(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity == Severity::Error)
    }

    pub fn num_errors(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn num_warnings(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

/// Run the documentation-build consistency check: every document id
/// referenced by a term, title, index entry, or object must exist in the
/// title/URL tables, and the object type tables must agree.
pub fn validate(index: &SearchIndex) -> ValidationReport {
    let mut report = ValidationReport::default();

    if index.titles.len() != index.docurls.len() {
        report.push(IssueKind::TitleUrlMismatch {
            titles: index.titles.len(),
            docurls: index.docurls.len(),
        });
    }
    // Resolvable ids are those present in both tables; checking against the
    // shorter side avoids piling dangling-id noise on a length mismatch.
    let bound = index.titles.len().min(index.docurls.len()) as DocId;

    check_term_map(&mut report, "terms", &index.terms, bound);
    check_term_map(&mut report, "titleterms", &index.titleterms, bound);

    for (title, anchors) in &index.alltitles {
        for anchor in anchors {
            if anchor.doc_id() >= bound {
                report.push(IssueKind::DanglingDocId {
                    section: "alltitles",
                    key: title.clone(),
                    doc_id: anchor.doc_id(),
                });
            }
        }
    }

    for (entry, anchors) in &index.indexentries {
        for anchor in anchors {
            if anchor.doc_id() >= bound {
                report.push(IssueKind::DanglingDocId {
                    section: "indexentries",
                    key: entry.clone(),
                    doc_id: anchor.doc_id(),
                });
            }
        }
    }

    for (prefix, entries) in &index.objects {
        for entry in entries {
            if entry.doc_id() >= bound {
                report.push(IssueKind::DanglingDocId {
                    section: "objects",
                    key: format!("{prefix}/{}", entry.name()),
                    doc_id: entry.doc_id(),
                });
            }
            let type_key = entry.type_index().to_string();
            if !index.objtypes.contains_key(&type_key) || !index.objnames.contains_key(&type_key) {
                report.push(IssueKind::UnknownObjectType {
                    prefix: prefix.clone(),
                    name: entry.name().to_string(),
                    type_index: entry.type_index(),
                });
            }
        }
    }

    let type_keys: BTreeSet<&String> = index.objtypes.keys().collect();
    let name_keys: BTreeSet<&String> = index.objnames.keys().collect();
    if type_keys != name_keys {
        report.push(IssueKind::ObjectTableMismatch {
            only_in_objtypes: type_keys
                .difference(&name_keys)
                .map(|k| (*k).clone())
                .collect(),
            only_in_objnames: name_keys
                .difference(&type_keys)
                .map(|k| (*k).clone())
                .collect(),
        });
    }

    if index.envversion.is_empty() {
        report.push(IssueKind::EmptyEnvVersion);
    }

    tracing::debug!(
        errors = report.num_errors(),
        warnings = report.num_warnings(),
        "validated search index"
    );
    report
}

fn check_term_map(
    report: &mut ValidationReport,
    section: &'static str,
    map: &std::collections::BTreeMap<String, Postings>,
    bound: DocId,
) {
    for (term, postings) in map {
        if term.is_empty() {
            report.push(IssueKind::EmptyTerm { section });
        }
        if postings.is_empty() {
            report.push(IssueKind::EmptyPostings {
                section,
                key: term.clone(),
            });
        }
        for doc_id in postings.iter() {
            if doc_id >= bound {
                report.push(IssueKind::DanglingDocId {
                    section,
                    key: term.clone(),
                    doc_id,
                });
            }
        }
        if !postings.as_slice().windows(2).all(|w| w[0] < w[1]) {
            report.push(IssueKind::UnsortedPostings {
                section,
                key: term.clone(),
            });
        }
    }
}
