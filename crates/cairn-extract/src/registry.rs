//! Extension and language-name dispatch to structural extractors.

use std::collections::HashMap;

use crate::extractors::{StructuralExtractor, javascript, python, typescript};

/// Maps lowercase extensions and language names to extractors.
///
/// Accepts bare extensions (`ts`, `.TS`), file names and paths
/// (`src/user.test.ts` resolves by its final extension), and language
/// names (`Python`).
#[derive(Debug, Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<StructuralExtractor>,
    by_key: HashMap<String, usize>,
}

impl ExtractorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Register an extractor under its language name and extensions.
    /// A later registration for the same key wins.
    pub fn register(&mut self, extractor: StructuralExtractor) {
        let index = self.extractors.len();
        let profile = extractor.profile();
        self.by_key.insert(profile.name.to_ascii_lowercase(), index);
        for ext in profile.extensions {
            self.by_key.insert(ext.to_ascii_lowercase(), index);
        }
        self.extractors.push(extractor);
    }

    /// Look up the extractor for an extension, file path, or language name.
    #[must_use]
    pub fn get(&self, ext_or_language: &str) -> Option<&StructuralExtractor> {
        let key = normalize_key(ext_or_language)?;
        let found = self.by_key.get(&key).map(|&i| &self.extractors[i]);
        if found.is_none() {
            tracing::debug!(input = ext_or_language, key, "no extractor registered");
        }
        found
    }

    #[must_use]
    pub fn supports(&self, ext_or_language: &str) -> bool {
        self.get(ext_or_language).is_some()
    }

    /// Names of the registered languages, in registration order.
    pub fn languages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extractors.iter().map(StructuralExtractor::language)
    }
}

impl Default for ExtractorRegistry {
    /// TypeScript, JavaScript and Python.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(typescript::extractor());
        registry.register(javascript::extractor());
        registry.register(python::extractor());
        registry
    }
}

fn normalize_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let file_name = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let key = file_name.rsplit_once('.').map_or(file_name, |(_, ext)| ext);
    if key.is_empty() {
        return None;
    }
    Some(key.to_ascii_lowercase())
}
