use docdex_core::lookup::{lookup_exact, lookup_object, lookup_term, titles_containing};
use docdex_core::{DocAnchor, ObjectEntry, ObjectName, Postings, SearchIndex};

fn tiny_index() -> SearchIndex {
    let mut idx = SearchIndex::new();
    idx.titles = vec![
        "Contributing".into(),
        "Design".into(),
        "Create Cluster".into(),
    ];
    idx.docurls = vec![
        "about/contributing.html".into(),
        "design.html".into(),
        "cluster.html".into(),
    ];
    idx.envversion.insert("sphinx".into(), 64);
    idx.terms.insert("cluster".into(), Postings(vec![0, 2]));
    idx.terms.insert("The".into(), Postings(vec![0, 1]));
    idx.terms.insert("1".into(), Postings(vec![1]));
    idx.titleterms.insert("cluster".into(), Postings(vec![2]));
    idx.alltitles
        .insert("Design".into(), vec![DocAnchor(1, None)]);
    idx.alltitles.insert(
        "Create Cluster".into(),
        vec![DocAnchor(2, Some("create-cluster".into()))],
    );
    idx.objects.insert(
        "ensemble".into(),
        vec![ObjectEntry(1, 0, 1, "ensemble-spec".into(), "EnsembleSpec".into())],
    );
    idx.objtypes.insert("0".into(), "py:class".into());
    idx.objnames.insert(
        "0".into(),
        ObjectName("py".into(), "class".into(), "Python class".into()),
    );
    idx
}

#[test]
fn lookup_stems_and_merges_title_hits() {
    let idx = tiny_index();
    // "Clusters" folds to the stored stem "cluster"; doc 2 also matches in
    // its title and must carry the flag.
    let hits = lookup_term(&idx, "Clusters");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, 0);
    assert!(!hits[0].in_title);
    assert_eq!(hits[1].doc_id, 2);
    assert!(hits[1].in_title);
    assert_eq!(hits[1].url, "cluster.html");
}

#[test]
fn hits_come_back_in_ascending_doc_order() {
    let idx = tiny_index();
    let hits = lookup_term(&idx, "cluster");
    let ids: Vec<u32> = hits.iter().map(|h| h.doc_id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[test]
fn verbatim_probe_finds_unstemmed_tokens() {
    let idx = tiny_index();
    // "The" is a stopword after folding, but the generator stored the
    // mixed-case token verbatim.
    let hits = lookup_term(&idx, "The");
    assert_eq!(hits.len(), 2);
    // Numeric tokens never fold to a stem either.
    let hits = lookup_term(&idx, "1");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 1);
}

#[test]
fn miss_returns_empty() {
    let idx = tiny_index();
    assert!(lookup_term(&idx, "absent").is_empty());
    assert!(lookup_term(&idx, "the").is_empty());
    assert!(lookup_term(&idx, "").is_empty());
}

#[test]
fn exact_lookup_skips_folding() {
    let idx = tiny_index();
    assert_eq!(lookup_exact(&idx, "cluster").len(), 2);
    assert!(lookup_exact(&idx, "Clusters").is_empty());
}

#[test]
fn object_lookup_resolves_type_and_anchor() {
    let idx = tiny_index();
    for query in ["EnsembleSpec", "ensemble.EnsembleSpec"] {
        let hits = lookup_object(&idx, query);
        assert_eq!(hits.len(), 1, "query {query:?}");
        let hit = &hits[0];
        assert_eq!(hit.name, "ensemble.EnsembleSpec");
        assert_eq!(hit.type_name, "Python class");
        assert_eq!(hit.doc_id, 1);
        assert_eq!(hit.url, "design.html#ensemble-spec");
    }
    assert!(lookup_object(&idx, "Missing").is_empty());
}

#[test]
fn title_scan_is_case_folded_and_anchored() {
    let idx = tiny_index();
    let hits = titles_containing(&idx, "cluster");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "cluster.html#create-cluster");
    assert_eq!(hits[0].anchor.as_deref(), Some("create-cluster"));

    let hits = titles_containing(&idx, "design");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, "design.html");
    assert!(hits[0].anchor.is_none());
}
