//! Input and output types for structural extraction.
//!
//! The input mirrors what an upstream parser emits per file. Every field is
//! `#[serde(default)]` so that partial JSON deserializes to "nothing of that
//! kind" instead of failing.

use cairn_core::enums::{EntityType, RelationshipType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Symbols, imports and exports of a single parsed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseResult {
    pub file_path: String,
    pub language: String,
    pub symbols: Vec<ParsedSymbol>,
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
}

impl ParseResult {
    /// Whether the file produced nothing to extract from.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.imports.is_empty() && self.exports.is_empty()
    }
}

/// The kind of a parsed symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Constructor,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Variable,
    Constant,
    Property,
    Module,
    Namespace,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SymbolKind {
    /// Kinds whose parameter and return types produce `uses_type` edges.
    #[must_use]
    pub const fn is_callable(self) -> bool {
        matches!(self, Self::Function | Self::Method | Self::Constructor)
    }

    /// Graph entity type used when this symbol is stored.
    #[must_use]
    pub const fn entity_type(self) -> EntityType {
        match self {
            Self::Function => EntityType::Function,
            Self::Method | Self::Constructor => EntityType::Method,
            Self::Class => EntityType::Class,
            Self::Interface => EntityType::Interface,
            Self::TypeAlias => EntityType::TypeAlias,
            Self::Enum => EntityType::Enum,
            Self::Constant => EntityType::Constant,
            Self::Property => EntityType::Property,
            Self::Module | Self::Namespace => EntityType::Module,
            Self::Variable | Self::Unknown => EntityType::Variable,
        }
    }
}

/// A symbol and its nested children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParsedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub qualified_name: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub signature: Option<String>,
    pub doc_comment: Option<String>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub children: Vec<Self>,
}

impl ParsedSymbol {
    /// The qualified name supplied by the parser, or one derived from the
    /// file path (`file:Name`) or the parent (`Parent.Name`).
    ///
    /// Returns `None` for a symbol with neither a qualified name nor a name.
    #[must_use]
    pub fn resolve_qualified_name(&self, file_path: &str, parent: Option<&str>) -> Option<String> {
        if let Some(qualified) = self.qualified_name.as_deref().filter(|q| !q.is_empty()) {
            return Some(qualified.to_string());
        }
        if self.name.is_empty() {
            return None;
        }
        Some(match parent {
            Some(parent) => format!("{parent}.{}", self.name),
            None => format!("{file_path}:{}", self.name),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<String>,
}

/// One import statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportRecord {
    /// Module path as written, e.g. `./user` or `react`.
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
    pub is_type_only: bool,
}

/// A named binding pulled in by an import. `*` denotes a namespace import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportSpecifier {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportSpecifier {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportRecord {
    pub name: String,
    pub is_default: bool,
    /// Set for re-exports (`export { x } from './y'`).
    pub source: Option<String>,
}

/// An edge produced by extraction. Endpoints are qualified names or paths;
/// resolving them to entity ids happens at ingest time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRelationship {
    pub source: String,
    pub target: String,
    pub relationship: RelationshipType,
    pub weight: f64,
    pub metadata: Map<String, Value>,
}

impl ExtractedRelationship {
    pub(crate) fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: RelationshipType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship,
            weight: 1.0,
            metadata: Map::new(),
        }
    }

    pub(crate) fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_uses_defaults() {
        let parsed: ParseResult = serde_json::from_str(
            r#"{"filePath": "a.ts", "symbols": [{"name": "run"}], "imports": [{}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.symbols[0].kind, SymbolKind::Unknown);
        assert!(parsed.symbols[0].parameters.is_empty());
        assert_eq!(parsed.imports[0].source, "");
        assert!(parsed.exports.is_empty());
    }

    #[test]
    fn unknown_kind_deserializes_to_unknown() {
        let symbol: ParsedSymbol =
            serde_json::from_str(r#"{"name": "x", "kind": "decorator"}"#).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Unknown);
    }

    #[test]
    fn qualified_name_derivation() {
        let symbol = ParsedSymbol {
            name: "save".into(),
            ..ParsedSymbol::default()
        };
        assert_eq!(
            symbol.resolve_qualified_name("src/repo.ts", None).as_deref(),
            Some("src/repo.ts:save")
        );
        assert_eq!(
            symbol
                .resolve_qualified_name("src/repo.ts", Some("src/repo.ts:Repo"))
                .as_deref(),
            Some("src/repo.ts:Repo.save")
        );

        let explicit = ParsedSymbol {
            qualified_name: Some("pkg.Repo.save".into()),
            ..symbol
        };
        assert_eq!(
            explicit.resolve_qualified_name("ignored", None).as_deref(),
            Some("pkg.Repo.save")
        );
    }

    #[test]
    fn nameless_symbol_has_no_qualified_name() {
        assert_eq!(ParsedSymbol::default().resolve_qualified_name("a.ts", None), None);
    }
}
