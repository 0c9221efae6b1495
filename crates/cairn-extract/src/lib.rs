//! # cairn-extract
//!
//! Structural relationship extraction for Cairn.
//!
//! Takes the per-file symbol tree produced by an upstream parser
//! ([`ParseResult`]) and turns it into typed graph edges:
//! - `imports` and `references` from import statements
//! - `contains` from nested symbols
//! - `uses_type` from parameter and return type annotations
//!
//! Extraction is pure and total: no I/O, no errors, and malformed input
//! simply produces fewer edges. Language differences live in
//! [`LanguageProfile`] tables, and [`ExtractorRegistry`] picks the right
//! extractor for a file extension or language name.

pub mod extractors;
pub mod registry;
pub mod types;

pub use extractors::{LanguageProfile, StructuralExtractor};
pub use registry::ExtractorRegistry;
pub use types::{
    ExportRecord, ExtractedRelationship, ImportRecord, ImportSpecifier, Parameter, ParseResult,
    ParsedSymbol, SymbolKind,
};
