use docdex_core::load::{index_to_string, load_index, load_index_str, save_index};
use tempfile::tempdir;

// Shaped like a real generator emit: wrapper call, alphabetical keys,
// bare-int singleton postings.
const FIXTURE_JS: &str = r#"Search.setIndex({"alltitles": {"Create Cluster": [[2, "create-cluster"]], "Design": [[2, null]], "User Guide": [[3, null]]}, "docurls": ["about/contributing.html", "about/index.html", "getting_started/design.html", "getting_started/user-guide.html"], "envversion": {"sphinx": 64, "sphinx.domains.std": 2}, "indexentries": {"scaling": [[2, "index-scaling"]]}, "objects": {"ensemble": [[1, 0, 1, "ensemble-spec", "EnsembleSpec"]]}, "objnames": {"0": ["py", "class", "Python class"]}, "objtypes": {"0": "py:class"}, "terms": {"The": [0, 1], "cluster": [1, 2], "grpc": 2, "member": [1, 2, 3], "run": [0, 3], "scale": [2, 3], "sidecar": 1}, "titles": ["Contributing", "About the Operator", "Design", "User Guide"], "titleterms": {"cluster": 2, "contribut": 0, "design": 2, "guid": 3}})"#;

fn bare_payload() -> &'static str {
    FIXTURE_JS
        .strip_prefix("Search.setIndex(")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap()
}

#[test]
fn wrapped_and_bare_parse_to_the_same_model() {
    let wrapped = load_index_str(FIXTURE_JS).unwrap();
    let bare = load_index_str(bare_payload()).unwrap();
    assert_eq!(wrapped, bare);
    assert_eq!(wrapped.num_docs(), 4);
    assert_eq!(wrapped.terms.len(), 7);
    let doc = wrapped.doc(2).unwrap();
    assert_eq!(doc.title, "Design");
    assert_eq!(doc.url, "getting_started/design.html");
}

#[test]
fn trailing_semicolon_and_whitespace_are_tolerated() {
    let raw = format!("{FIXTURE_JS};\n");
    let index = load_index_str(&raw).unwrap();
    assert_eq!(index.num_docs(), 4);
}

#[test]
fn postings_decode_bare_ints_and_arrays() {
    let index = load_index_str(FIXTURE_JS).unwrap();
    assert_eq!(index.terms["grpc"].as_slice(), &[2]);
    assert_eq!(index.terms["member"].as_slice(), &[1, 2, 3]);
    assert_eq!(index.titleterms["guid"].as_slice(), &[3]);
}

#[test]
fn singleton_postings_reencode_as_bare_ints() {
    let index = load_index_str(FIXTURE_JS).unwrap();
    let out = index_to_string(&index, false, false).unwrap();
    assert!(out.contains(r#""grpc":2"#));
    assert!(out.contains(r#""member":[1,2,3]"#));
}

#[test]
fn string_round_trip_is_identity() {
    let index = load_index_str(FIXTURE_JS).unwrap();
    for wrap in [false, true] {
        let out = index_to_string(&index, wrap, false).unwrap();
        let reparsed = load_index_str(&out).unwrap();
        assert_eq!(index, reparsed);
    }
}

#[test]
fn file_round_trip_is_identity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("searchindex.js");
    let index = load_index_str(FIXTURE_JS).unwrap();
    save_index(&path, &index, true).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("Search.setIndex("));
    assert!(written.ends_with(')'));

    let reloaded = load_index(&path).unwrap();
    assert_eq!(index, reloaded);
}

#[test]
fn malformed_input_errors() {
    assert!(load_index_str("Search.setIndex(nope)").is_err());
    assert!(load_index_str("[1, 2]").is_err());
    assert!(load_index_str("").is_err());
}

#[test]
fn missing_file_errors() {
    let dir = tempdir().unwrap();
    assert!(load_index(dir.path().join("absent.js")).is_err());
}
