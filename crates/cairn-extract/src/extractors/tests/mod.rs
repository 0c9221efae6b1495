use cairn_core::enums::RelationshipType;
use pretty_assertions::assert_eq;

use super::*;
use crate::types::{ImportSpecifier, Parameter, SymbolKind};

mod containment;
mod imports;
mod python_types;

fn of_type(
    edges: &[ExtractedRelationship],
    relationship: RelationshipType,
) -> Vec<&ExtractedRelationship> {
    edges.iter().filter(|e| e.relationship == relationship).collect()
}

fn targets(edges: &[ExtractedRelationship], relationship: RelationshipType) -> Vec<String> {
    of_type(edges, relationship)
        .into_iter()
        .map(|e| e.target.clone())
        .collect()
}

fn function(name: &str, params: &[(&str, Option<&str>)], ret: Option<&str>) -> ParsedSymbol {
    ParsedSymbol {
        name: name.into(),
        kind: SymbolKind::Function,
        parameters: params
            .iter()
            .map(|(n, t)| Parameter {
                name: (*n).into(),
                type_annotation: t.map(String::from),
            })
            .collect(),
        return_type: ret.map(String::from),
        ..ParsedSymbol::default()
    }
}

fn file_with(symbols: Vec<ParsedSymbol>) -> ParseResult {
    ParseResult {
        file_path: "src/service.ts".into(),
        language: "typescript".into(),
        symbols,
        ..ParseResult::default()
    }
}

#[test]
fn empty_parse_result_yields_nothing() {
    for extractor in [
        typescript::extractor(),
        javascript::extractor(),
        python::extractor(),
    ] {
        assert!(extractor.extract(&ParseResult::default()).is_empty());
    }
}

#[test]
fn extraction_is_deterministic() {
    let parsed = ParseResult {
        file_path: "src/a.ts".into(),
        imports: vec![ImportRecord {
            source: "./b".into(),
            specifiers: vec![ImportSpecifier {
                name: "B".into(),
                alias: None,
            }],
            is_type_only: false,
        }],
        symbols: vec![function("run", &[("b", Some("B"))], Some("Result"))],
        ..ParseResult::default()
    };
    let extractor = typescript::extractor();
    assert_eq!(extractor.extract(&parsed), extractor.extract(&parsed));
}

#[test]
fn structural_edges_have_unit_weight() {
    let parsed = file_with(vec![function("run", &[("b", Some("B"))], None)]);
    for edge in typescript::extractor().extract(&parsed) {
        assert!((edge.weight - 1.0).abs() < f64::EPSILON);
    }
}
