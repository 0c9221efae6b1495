use pretty_assertions::assert_eq;

use super::*;

fn symbol(name: &str, kind: SymbolKind, children: Vec<ParsedSymbol>) -> ParsedSymbol {
    ParsedSymbol {
        name: name.into(),
        kind,
        children,
        ..ParsedSymbol::default()
    }
}

#[test]
fn class_contains_its_members() {
    let parsed = file_with(vec![symbol(
        "UserService",
        SymbolKind::Class,
        vec![
            symbol("repo", SymbolKind::Property, vec![]),
            symbol("find", SymbolKind::Method, vec![]),
        ],
    )]);
    let edges = typescript::extractor().extract(&parsed);
    let contains = of_type(&edges, RelationshipType::Contains);
    assert_eq!(contains.len(), 2);
    assert_eq!(contains[0].source, "src/service.ts:UserService");
    assert_eq!(contains[0].target, "src/service.ts:UserService.repo");
    assert_eq!(contains[1].target, "src/service.ts:UserService.find");
}

#[test]
fn containment_is_recursive() {
    let parsed = file_with(vec![symbol(
        "Outer",
        SymbolKind::Namespace,
        vec![symbol(
            "Inner",
            SymbolKind::Class,
            vec![symbol(
                "method",
                SymbolKind::Method,
                vec![symbol("local", SymbolKind::Variable, vec![])],
            )],
        )],
    )]);
    let edges = typescript::extractor().extract(&parsed);
    let pairs: Vec<(String, String)> = of_type(&edges, RelationshipType::Contains)
        .into_iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (
                "src/service.ts:Outer".to_string(),
                "src/service.ts:Outer.Inner".to_string()
            ),
            (
                "src/service.ts:Outer.Inner".to_string(),
                "src/service.ts:Outer.Inner.method".to_string()
            ),
            (
                "src/service.ts:Outer.Inner.method".to_string(),
                "src/service.ts:Outer.Inner.method.local".to_string()
            ),
        ]
    );
}

#[test]
fn explicit_qualified_names_are_respected() {
    let mut parent = symbol("Repo", SymbolKind::Class, vec![]);
    parent.qualified_name = Some("app.models.Repo".into());
    let mut child = symbol("save", SymbolKind::Method, vec![]);
    child.qualified_name = Some("app.models.Repo.save".into());
    parent.children.push(child);

    let edges = python::extractor().extract(&file_with(vec![parent]));
    let contains = of_type(&edges, RelationshipType::Contains);
    assert_eq!(contains[0].source, "app.models.Repo");
    assert_eq!(contains[0].target, "app.models.Repo.save");
}

#[test]
fn nameless_child_is_skipped() {
    let parsed = file_with(vec![symbol(
        "Widget",
        SymbolKind::Class,
        vec![ParsedSymbol::default(), symbol("render", SymbolKind::Method, vec![])],
    )]);
    let edges = typescript::extractor().extract(&parsed);
    assert_eq!(
        targets(&edges, RelationshipType::Contains),
        vec!["src/service.ts:Widget.render"]
    );
}

#[test]
fn methods_inside_classes_emit_type_usage() {
    let mut method = function("save", &[("user", Some("User"))], Some("Promise<void>"));
    method.kind = SymbolKind::Method;
    let parsed = file_with(vec![symbol("Repo", SymbolKind::Class, vec![method])]);
    let edges = typescript::extractor().extract(&parsed);
    let uses = of_type(&edges, RelationshipType::UsesType);
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].source, "src/service.ts:Repo.save");
    assert_eq!(uses[0].target, "User");
}
