//! TypeScript: static types, `<>` generics, `T[]` arrays, `A | null` unions.

use super::{LanguageProfile, StructuralExtractor};

pub static PROFILE: LanguageProfile = LanguageProfile {
    name: "typescript",
    extensions: &["ts", "tsx", "mts", "cts"],
    emits_type_usage: true,
    generic_open: '<',
    generic_close: '>',
    transparent_wrappers: &[
        "Array",
        "ReadonlyArray",
        "Promise",
        "PromiseLike",
        "Awaited",
        "Partial",
        "Required",
        "Readonly",
        "NonNullable",
        "Set",
        "ReadonlySet",
        "Map",
        "ReadonlyMap",
        "Record",
        "Iterable",
        "AsyncIterable",
        "Iterator",
        "AsyncIterator",
    ],
    union_wrappers: &[],
    null_types: &["null", "undefined"],
    primitives: &[
        "string", "number", "boolean", "bigint", "symbol", "object", "any", "unknown", "void",
        "never", "null", "undefined", "this", "String", "Number", "Boolean", "Object", "Function",
    ],
    type_modifiers: &["readonly ", "unique "],
    array_suffix: true,
    quoted_forward_refs: false,
};

#[must_use]
pub const fn extractor() -> StructuralExtractor {
    StructuralExtractor::new(&PROFILE)
}
