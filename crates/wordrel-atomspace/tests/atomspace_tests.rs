//! AtomSpace E2E Tests

use tempfile::tempdir;
use wordrel_atomspace::*;

const SENTENCE: &str = r#"
(LemmaLink (WordInstanceNode "ate@s1") (WordNode "eat"))
(LemmaLink (WordInstanceNode "cake@s1") (WordNode "cake"))
(EvaluationLink
   (DefinedLinguisticRelationshipNode "_obj")
   (ListLink (WordInstanceNode "ate@s1") (WordInstanceNode "cake@s1")))
(InheritanceLink (WordInstanceNode "ate@s1") (DefinedLinguisticConceptNode "past"))
"#;

// ============================================================================
// Snapshot Tests
// ============================================================================

#[test]
fn test_snapshot_file_round_trip() {
    let mut space = AtomSpace::new();
    let roots = space.import_text(SENTENCE).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.wrdb");
    std::fs::write(&path, space.to_bytes().unwrap()).unwrap();

    let restored = AtomSpace::from_bytes(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(restored.len(), space.len());
    for &r in &roots {
        assert_eq!(restored.render(r).unwrap(), space.render(r).unwrap());
    }

    // Indexes are rebuilt: dedup, incoming and type lookups all work.
    let inst = restored
        .get_node(AtomType::WordInstanceNode, "ate@s1")
        .unwrap();
    assert_eq!(
        restored.incoming(inst).unwrap(),
        space.incoming(inst).unwrap()
    );
    assert_eq!(restored.type_count(AtomType::LemmaLink), 2);
    let root = restored.follow_binary_link(inst, AtomType::LemmaLink).unwrap();
    assert_eq!(root, restored.get_node(AtomType::WordNode, "eat"));
}

#[test]
fn test_snapshot_rejects_garbage() {
    assert!(AtomSpace::from_bytes(b"nope").is_err());
    assert!(AtomSpace::from_bytes(b"WRAS\x09\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00").is_err());

    let mut space = AtomSpace::new();
    space.import_text(SENTENCE).unwrap();
    let mut bytes = space.to_bytes().unwrap();
    bytes.truncate(bytes.len() - 3);
    assert!(AtomSpace::from_bytes(&bytes).is_err());
}

#[test]
fn test_restored_space_keeps_deduplicating() {
    let mut space = AtomSpace::new();
    space.import_text(SENTENCE).unwrap();
    let mut restored = AtomSpace::from_bytes(&space.to_bytes().unwrap()).unwrap();

    let before = restored.len();
    restored.import_text(SENTENCE).unwrap();
    assert_eq!(restored.len(), before);
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_get_link_without_insert() {
    let mut space = AtomSpace::new();
    space.import_text(SENTENCE).unwrap();
    let a = space.get_node(AtomType::WordInstanceNode, "ate@s1").unwrap();
    let c = space.get_node(AtomType::WordInstanceNode, "cake@s1").unwrap();

    assert!(space.get_link(AtomType::ListLink, &[a, c]).is_some());
    assert!(space.get_link(AtomType::ListLink, &[c, a]).is_none());
}

#[test]
fn test_iter_is_creation_order() {
    let mut space = AtomSpace::new();
    space.import_text(SENTENCE).unwrap();
    let handles: Vec<u32> = space.iter().map(|(h, _)| h.raw()).collect();
    assert_eq!(handles, (0..space.len() as u32).collect::<Vec<_>>());
}
