//! End-to-end extraction over a realistic parser output.

use cairn_core::enums::RelationshipType;
use cairn_extract::{ExtractorRegistry, ParseResult};
use pretty_assertions::assert_eq;

fn load_fixture() -> ParseResult {
    serde_json::from_str(include_str!("fixtures/user_service.json")).expect("fixture parses")
}

fn count(edges: &[cairn_extract::ExtractedRelationship], ty: RelationshipType) -> usize {
    edges.iter().filter(|e| e.relationship == ty).count()
}

#[test]
fn typescript_fixture_edges() {
    let parsed = load_fixture();
    let registry = ExtractorRegistry::default();
    let extractor = registry.get(&parsed.file_path).expect("ts extractor");
    let edges = extractor.extract(&parsed);

    assert_eq!(count(&edges, RelationshipType::Imports), 3);
    // User, UserId, Mailer; the namespace import is skipped
    assert_eq!(count(&edges, RelationshipType::References), 3);
    assert_eq!(count(&edges, RelationshipType::Contains), 4);
    // Mailer (ctor), UserId + User (find), UserId (rename), UserService (factory)
    assert_eq!(count(&edges, RelationshipType::UsesType), 5);
    assert_eq!(edges.len(), 15);

    let type_only = edges
        .iter()
        .find(|e| e.relationship == RelationshipType::Imports && e.target == "./mailer")
        .expect("mailer import");
    assert_eq!(type_only.metadata["typeOnly"], true);
}

#[test]
fn same_fixture_as_javascript_drops_type_usage() {
    let parsed = load_fixture();
    let registry = ExtractorRegistry::default();
    let edges = registry.get("javascript").expect("js extractor").extract(&parsed);
    assert_eq!(count(&edges, RelationshipType::UsesType), 0);
    assert_eq!(edges.len(), 10);
}
