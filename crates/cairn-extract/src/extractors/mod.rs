//! Structural extraction: one shared algorithm, parameterized per language.

pub mod javascript;
mod normalize;
mod profile;
pub mod python;
pub mod typescript;

use cairn_core::enums::RelationshipType;

pub use profile::LanguageProfile;

use crate::types::{ExtractedRelationship, ImportRecord, ParseResult, ParsedSymbol};
use normalize::normalize_type;

/// Turns a [`ParseResult`] into structural relationships for one language.
#[derive(Debug, Clone, Copy)]
pub struct StructuralExtractor {
    profile: &'static LanguageProfile,
}

impl StructuralExtractor {
    #[must_use]
    pub const fn new(profile: &'static LanguageProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub const fn profile(&self) -> &'static LanguageProfile {
        self.profile
    }

    #[must_use]
    pub const fn language(&self) -> &'static str {
        self.profile.name
    }

    /// Extract every structural relationship from a parsed file.
    ///
    /// Deterministic and side-effect free. Edges come out in source order:
    /// imports first, then each top-level symbol walked depth-first.
    #[must_use]
    pub fn extract(&self, parsed: &ParseResult) -> Vec<ExtractedRelationship> {
        let mut out = Vec::new();

        for import in &parsed.imports {
            extract_import(&parsed.file_path, import, &mut out);
        }

        for symbol in &parsed.symbols {
            if let Some(qualified) = symbol.resolve_qualified_name(&parsed.file_path, None) {
                self.walk_symbol(&parsed.file_path, symbol, &qualified, &mut out);
            }
        }

        tracing::trace!(
            file = %parsed.file_path,
            language = self.profile.name,
            edges = out.len(),
            "extracted structural relationships"
        );
        out
    }

    fn walk_symbol(
        &self,
        file_path: &str,
        symbol: &ParsedSymbol,
        qualified: &str,
        out: &mut Vec<ExtractedRelationship>,
    ) {
        if self.profile.emits_type_usage && symbol.kind.is_callable() {
            self.extract_type_usage(symbol, qualified, out);
        }

        for child in &symbol.children {
            let Some(child_qualified) = child.resolve_qualified_name(file_path, Some(qualified))
            else {
                continue;
            };
            out.push(ExtractedRelationship::new(
                qualified,
                child_qualified.as_str(),
                RelationshipType::Contains,
            ));
            self.walk_symbol(file_path, child, &child_qualified, out);
        }
    }

    fn extract_type_usage(
        &self,
        symbol: &ParsedSymbol,
        qualified: &str,
        out: &mut Vec<ExtractedRelationship>,
    ) {
        for param in &symbol.parameters {
            let Some(target) = param
                .type_annotation
                .as_deref()
                .and_then(|t| normalize_type(t, self.profile))
            else {
                continue;
            };
            out.push(
                ExtractedRelationship::new(qualified, target, RelationshipType::UsesType)
                    .with_meta("role", "parameter")
                    .with_meta("parameter", param.name.as_str()),
            );
        }

        if let Some(target) = symbol
            .return_type
            .as_deref()
            .and_then(|t| normalize_type(t, self.profile))
        {
            out.push(
                ExtractedRelationship::new(qualified, target, RelationshipType::UsesType)
                    .with_meta("role", "return"),
            );
        }
    }
}

fn extract_import(file_path: &str, import: &ImportRecord, out: &mut Vec<ExtractedRelationship>) {
    if import.source.is_empty() {
        return;
    }

    let mut edge =
        ExtractedRelationship::new(file_path, import.source.as_str(), RelationshipType::Imports);
    if import.is_type_only {
        edge = edge.with_meta("typeOnly", true);
    }
    out.push(edge);

    for spec in &import.specifiers {
        if spec.is_wildcard() || spec.name.is_empty() {
            continue;
        }
        let mut edge = ExtractedRelationship::new(
            file_path,
            format!("{}:{}", import.source, spec.name),
            RelationshipType::References,
        )
        .with_meta("module", import.source.as_str());
        if let Some(alias) = &spec.alias {
            edge = edge.with_meta("alias", alias.as_str());
        }
        out.push(edge);
    }
}

#[cfg(test)]
mod tests;
