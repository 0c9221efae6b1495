//! Per-language tables consumed by the shared extraction algorithm.

/// Everything that differs between languages, expressed as data.
///
/// Adding a language means writing one of these, not a new extractor.
#[derive(Debug)]
pub struct LanguageProfile {
    /// Canonical language name, also accepted by the registry.
    pub name: &'static str,
    /// Lowercase file extensions without the dot.
    pub extensions: &'static [&'static str],
    /// Dynamic languages have no annotations worth linking.
    pub emits_type_usage: bool,
    pub generic_open: char,
    pub generic_close: char,
    /// Generic names that unwrap to their first type argument.
    pub transparent_wrappers: &'static [&'static str],
    /// Generic names whose arguments are union members (`Union[A, None]`).
    pub union_wrappers: &'static [&'static str],
    /// Names skipped as union members.
    pub null_types: &'static [&'static str],
    /// Built-in names that never become graph edges.
    pub primitives: &'static [&'static str],
    /// Prefix keywords stripped before normalizing (`readonly T[]`).
    pub type_modifiers: &'static [&'static str],
    /// Whether `T[]` means an array of `T`.
    pub array_suffix: bool,
    /// Whether annotations may be quoted forward references (`"User"`).
    pub quoted_forward_refs: bool,
}

impl LanguageProfile {
    pub(crate) fn is_null(&self, ty: &str) -> bool {
        self.null_types.contains(&ty)
    }

    pub(crate) fn is_primitive(&self, ty: &str) -> bool {
        self.primitives.contains(&ty) || self.primitives.contains(&last_segment(ty))
    }
}

/// `typing.Optional` -> `Optional`.
pub(crate) fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
