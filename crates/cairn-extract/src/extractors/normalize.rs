//! Type annotation normalization for `uses_type` edges.
//!
//! Reduces an annotation to the one type name worth linking to, or `None`
//! when nothing informative is left.

use super::profile::{LanguageProfile, last_segment};

const MAX_DEPTH: usize = 8;

/// Normalize a raw annotation against a language profile.
///
/// - unions take their first non-null member
/// - transparent wrappers unwrap to their first argument
/// - other generics keep their outer name
/// - primitives, function types, object literals and tuples yield `None`
pub(crate) fn normalize_type(raw: &str, profile: &LanguageProfile) -> Option<String> {
    normalize_at(raw, profile, 0)
}

fn normalize_at(raw: &str, profile: &LanguageProfile, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut ty = raw.trim();
    if profile.quoted_forward_refs {
        ty = strip_quotes(ty).trim();
    }
    for modifier in profile.type_modifiers {
        if let Some(rest) = ty.strip_prefix(modifier) {
            ty = rest.trim_start();
        }
    }
    if ty.is_empty() {
        return None;
    }

    let members = split_top_level(ty, '|');
    if members.len() > 1 {
        let first = members
            .iter()
            .map(|m| m.trim())
            .find(|m| !m.is_empty() && !profile.is_null(m))?;
        return normalize_at(first, profile, depth + 1);
    }

    if ty.starts_with(['(', '{', '[', '\'', '"', '`']) || ty.contains("=>") {
        return None;
    }

    if let Some(element) = ty.strip_suffix("[]").filter(|_| profile.array_suffix) {
        return normalize_at(element, profile, depth + 1);
    }

    if let Some(open) = ty.find(profile.generic_open) {
        let inner = ty[open + 1..].strip_suffix(profile.generic_close)?;
        let outer = ty[..open].trim();
        let bare = last_segment(outer);
        let args = split_top_level(inner, ',');

        if profile.union_wrappers.contains(&bare) {
            let first = args
                .iter()
                .map(|a| a.trim())
                .find(|a| !a.is_empty() && !profile.is_null(a))?;
            return normalize_at(first, profile, depth + 1);
        }
        if profile.transparent_wrappers.contains(&bare) {
            return normalize_at(args.first()?, profile, depth + 1);
        }
        ty = outer;
    }

    if ty.is_empty() || profile.is_null(ty) || profile.is_primitive(ty) {
        return None;
    }
    Some(ty.to_string())
}

fn strip_quotes(ty: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = ty.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner;
        }
    }
    ty
}

/// Split on `sep` outside any bracket pair. `=>` never closes a bracket.
fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        match c {
            '<' | '[' | '(' | '{' => depth += 1,
            '>' if prev == '=' => {}
            '>' | ']' | ')' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_nesting() {
        assert_eq!(split_top_level("Map<K, V>, User", ','), vec!["Map<K, V>", " User"]);
        assert_eq!(
            split_top_level("(a: A) => B | null", '|'),
            vec!["(a: A) => B ", " null"]
        );
    }

    #[test]
    fn strip_quotes_handles_both_styles() {
        assert_eq!(strip_quotes("\"User\""), "User");
        assert_eq!(strip_quotes("'User'"), "User");
        assert_eq!(strip_quotes("User"), "User");
    }
}
