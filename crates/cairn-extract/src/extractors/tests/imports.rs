use pretty_assertions::assert_eq;

use super::*;

fn import(source: &str, names: &[&str]) -> ImportRecord {
    ImportRecord {
        source: source.into(),
        specifiers: names
            .iter()
            .map(|n| ImportSpecifier {
                name: (*n).into(),
                alias: None,
            })
            .collect(),
        is_type_only: false,
    }
}

#[test]
fn one_imports_edge_per_record() {
    let parsed = ParseResult {
        file_path: "src/app.ts".into(),
        imports: vec![import("./user", &[]), import("react", &[])],
        ..ParseResult::default()
    };
    let edges = typescript::extractor().extract(&parsed);
    let imports = of_type(&edges, RelationshipType::Imports);
    assert_eq!(imports.len(), 2);
    assert_eq!(imports[0].source, "src/app.ts");
    assert_eq!(imports[0].target, "./user");
    assert_eq!(imports[1].target, "react");
}

#[test]
fn named_specifiers_become_references() {
    let parsed = ParseResult {
        file_path: "src/app.ts".into(),
        imports: vec![import("./user", &["User", "createUser"])],
        ..ParseResult::default()
    };
    let edges = typescript::extractor().extract(&parsed);
    assert_eq!(
        targets(&edges, RelationshipType::References),
        vec!["./user:User", "./user:createUser"]
    );
    let first = of_type(&edges, RelationshipType::References)[0];
    assert_eq!(first.metadata["module"], "./user");
}

#[test]
fn wildcard_specifier_is_skipped() {
    let parsed = ParseResult {
        file_path: "src/app.ts".into(),
        imports: vec![import("./utils", &["*", "debounce"])],
        ..ParseResult::default()
    };
    let edges = typescript::extractor().extract(&parsed);
    assert_eq!(of_type(&edges, RelationshipType::Imports).len(), 1);
    assert_eq!(
        targets(&edges, RelationshipType::References),
        vec!["./utils:debounce"]
    );
}

#[test]
fn alias_is_kept_in_metadata() {
    let parsed = ParseResult {
        file_path: "app.py".into(),
        imports: vec![ImportRecord {
            source: "numpy".into(),
            specifiers: vec![ImportSpecifier {
                name: "array".into(),
                alias: Some("arr".into()),
            }],
            is_type_only: false,
        }],
        ..ParseResult::default()
    };
    let edges = python::extractor().extract(&parsed);
    let reference = of_type(&edges, RelationshipType::References)[0];
    assert_eq!(reference.metadata["alias"], "arr");
}

#[test]
fn import_without_source_is_ignored() {
    let parsed = ParseResult {
        file_path: "src/app.ts".into(),
        imports: vec![import("", &["Lost"])],
        ..ParseResult::default()
    };
    assert!(typescript::extractor().extract(&parsed).is_empty());
}

#[test]
fn javascript_keeps_import_edges() {
    let parsed = ParseResult {
        file_path: "src/app.js".into(),
        imports: vec![import("lodash", &["map"])],
        ..ParseResult::default()
    };
    let edges = javascript::extractor().extract(&parsed);
    assert_eq!(edges.len(), 2);
}
