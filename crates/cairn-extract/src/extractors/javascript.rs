//! JavaScript: same walk as TypeScript, but no `uses_type` edges since the
//! language has no static annotations.

use super::{LanguageProfile, StructuralExtractor};

pub static PROFILE: LanguageProfile = LanguageProfile {
    name: "javascript",
    extensions: &["js", "jsx", "mjs", "cjs"],
    emits_type_usage: false,
    generic_open: '<',
    generic_close: '>',
    transparent_wrappers: &[],
    union_wrappers: &[],
    null_types: &[],
    primitives: &[],
    type_modifiers: &[],
    array_suffix: false,
    quoted_forward_refs: false,
};

#[must_use]
pub const fn extractor() -> StructuralExtractor {
    StructuralExtractor::new(&PROFILE)
}
