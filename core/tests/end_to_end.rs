use sift_core::build::IndexBuilder;
use sift_core::config::SearchConfig;
use sift_core::persist::{IndexPaths, PostingsStore};
use sift_core::router::QueryRouter;
use sift_core::tokenizer::{Analyzer, AnalyzerConfig};
use sift_core::{DocId, DocMeta, IndexMode};
use tempfile::TempDir;

fn build(mode: IndexMode, docs: &[(DocId, &[&str])]) -> (TempDir, QueryRouter) {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("dictionary.txt"), dir.path().join("postings.txt"));
    let mut builder = IndexBuilder::new(mode, AnalyzerConfig::default());
    for &(id, terms) in docs {
        builder.add_document(id, DocMeta::default(), terms).unwrap();
    }
    builder.finish(&paths).unwrap();
    let store = PostingsStore::open(&paths).unwrap();
    (dir, QueryRouter::new(store, SearchConfig::default()))
}

const CAT_DOG: &[&str] = &["cat", "dog"];
const DOG_FISH: &[&str] = &["dog", "fish"];
const QUICK_BROWN_FOX: &[&str] = &["quick", "brown", "fox"];

#[test]
fn boolean_two_documents() {
    let (_dir, mut router) = build(IndexMode::Boolean, &[(1, CAT_DOG), (2, DOG_FISH)]);
    assert_eq!(router.route("cat AND dog").unwrap(), vec![1]);
    assert_eq!(router.route("cat OR fish").unwrap(), vec![1, 2]);
    assert_eq!(router.route("NOT cat").unwrap(), vec![2]);
    assert_eq!(router.route("dog AND NOT (cat OR fish)").unwrap(), Vec::<DocId>::new());
    assert_eq!(router.route("NOT cat OR NOT fish").unwrap(), vec![1, 2]);
    assert_eq!(router.route("").unwrap(), Vec::<DocId>::new());
}

#[test]
fn boolean_document_zero_is_not_dropped() {
    let (_dir, mut router) = build(IndexMode::Boolean, &[(0, CAT_DOG), (1, DOG_FISH)]);
    assert_eq!(router.route("dog").unwrap(), vec![0, 1]);
    assert_eq!(router.route("cat AND dog").unwrap(), vec![0]);
    assert_eq!(router.route("NOT fish").unwrap(), vec![0]);
}

#[test]
fn boolean_long_lists_use_skips() {
    let evens: Vec<(DocId, &[&str])> = (0..100)
        .map(|d| (d, if d % 2 == 0 { CAT_DOG } else { DOG_FISH }))
        .collect();
    let (_dir, mut router) = build(IndexMode::Boolean, &evens);
    let cats = router.route("cat AND dog").unwrap();
    assert_eq!(cats, (0..100).step_by(2).collect::<Vec<DocId>>());
    assert_eq!(router.route("cat AND fish").unwrap(), Vec::<DocId>::new());
}

#[test]
fn ranked_single_term() {
    let (_dir, mut router) = build(IndexMode::Ranked, &[(1, CAT_DOG), (2, DOG_FISH)]);
    // equal weights, tie broken by document id
    assert_eq!(router.route("dog").unwrap(), vec![1, 2]);
}

#[test]
fn phrase_queries() {
    let (_dir, mut router) =
        build(IndexMode::Phrasal, &[(1, CAT_DOG), (2, DOG_FISH), (3, QUICK_BROWN_FOX)]);
    assert_eq!(router.route("\"quick brown\"").unwrap(), vec![3]);
    assert!(!router.route("\"brown quick\"").unwrap().contains(&3));
}

#[test]
fn boolean_implicit_and_respects_precedence() {
    let (_dir, mut router) = build(IndexMode::Boolean, &[(1, CAT_DOG), (2, DOG_FISH)]);
    assert_eq!(router.route("NOT cat fish").unwrap(), vec![2]);
    assert_eq!(router.route("(cat dog) OR fish").unwrap(), vec![1, 2]);
    assert_eq!(router.route("dog NOT fish").unwrap(), vec![1]);
}

#[test]
fn boolean_stopwords_drop_out_of_queries() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::in_dir(dir.path());
    let analyzer = Analyzer::default();
    let mut builder = IndexBuilder::new(IndexMode::Boolean, AnalyzerConfig::default());
    builder.add_document(1, DocMeta::default(), &analyzer.analyze("the cat sat")).unwrap();
    builder.add_document(2, DocMeta::default(), &analyzer.analyze("a dog ran")).unwrap();
    builder.finish(&paths).unwrap();
    let mut router = QueryRouter::new(PostingsStore::open(&paths).unwrap(), SearchConfig::default());

    assert_eq!(router.route("the AND cat").unwrap(), vec![1]);
    assert_eq!(router.route("cat OR a").unwrap(), vec![1]);
    assert_eq!(router.route("the").unwrap(), Vec::<DocId>::new());
    // punctuation-only operands still match nothing
    assert_eq!(router.route("cat AND ?!").unwrap(), Vec::<DocId>::new());
}

#[test]
fn boolean_hyphenated_operand_matches_document_text() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::in_dir(dir.path());
    let analyzer = Analyzer::default();
    let mut builder = IndexBuilder::new(IndexMode::Boolean, AnalyzerConfig::default());
    builder.add_document(1, DocMeta::default(), &analyzer.analyze("send an e-mail")).unwrap();
    builder.add_document(2, DocMeta::default(), &analyzer.analyze("check your mail")).unwrap();
    builder.finish(&paths).unwrap();
    let mut router = QueryRouter::new(PostingsStore::open(&paths).unwrap(), SearchConfig::default());

    assert_eq!(router.route("e-mail").unwrap(), vec![1]);
}

#[test]
fn universe_key_is_not_searchable() {
    let (_dir, mut router) = build(IndexMode::Boolean, &[(1, CAT_DOG), (2, DOG_FISH)]);
    assert_eq!(router.route("__all__").unwrap(), Vec::<DocId>::new());
    assert_eq!(router.store().document_frequency("__all__"), 0);
}
