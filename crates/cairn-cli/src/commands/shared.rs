use cairn_core::enums::{EdgeType, EntityType};
use serde::de::DeserializeOwned;

/// Parse an enum value through its serde names, accepting `-` and `_`
/// interchangeably (`type-alias`, `pre_push`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let mut first_error = None;
    for candidate in [raw.to_string(), raw.replace('-', "_"), raw.replace('_', "-")] {
        match serde_json::from_value(serde_json::Value::String(candidate)) {
            Ok(value) => return Ok(value),
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }
    let detail = first_error.map_or_else(String::new, |e| format!(": {e}"));
    anyhow::bail!("invalid {field} '{raw}'{detail}")
}

/// Empty input means "use the default".
pub fn parse_entity_types(raw: &[String]) -> anyhow::Result<Option<Vec<EntityType>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|value| parse_enum(value.trim(), "entity type"))
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Some)
}

/// Relationship tags are case-sensitive: `relates_to` is structural-style,
/// `RELATES_TO` is the taxonomy relation.
pub fn parse_edge_type(raw: Option<&str>, default: EdgeType) -> anyhow::Result<EdgeType> {
    raw.map_or(Ok(default), |value| {
        value.parse::<EdgeType>().map_err(anyhow::Error::msg)
    })
}

/// Compute effective limit with precedence: local arg -> global flag -> fallback.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use cairn_core::enums::{GraphRelation, HookType, RelationshipType};

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_snake_and_kebab_spellings() {
        let ty: EntityType = parse_enum("type-alias", "entity type").unwrap();
        assert_eq!(ty, EntityType::TypeAlias);
        let hook: HookType = parse_enum("pre_push", "hook").unwrap();
        assert_eq!(hook, HookType::PrePush);
        let hook: HookType = parse_enum("post-merge", "hook").unwrap();
        assert_eq!(hook, HookType::PostMerge);
    }

    #[test]
    fn invalid_enum_names_the_field() {
        let err = parse_enum::<EntityType>("widget", "entity type").unwrap_err();
        assert!(err.to_string().starts_with("invalid entity type 'widget'"));
    }

    #[test]
    fn empty_type_list_means_default() {
        assert_eq!(parse_entity_types(&[]).unwrap(), None);
        assert_eq!(
            parse_entity_types(&["function".into(), " class".into()]).unwrap(),
            Some(vec![EntityType::Function, EntityType::Class])
        );
        assert!(parse_entity_types(&["nope".into()]).is_err());
    }

    #[test]
    fn edge_type_is_case_sensitive() {
        assert_eq!(
            parse_edge_type(None, EdgeType::SEMANTIC_DEFAULT).unwrap(),
            EdgeType::Graph(GraphRelation::RelatesTo)
        );
        assert_eq!(
            parse_edge_type(Some("contains"), EdgeType::SEMANTIC_DEFAULT).unwrap(),
            EdgeType::Structural(RelationshipType::Contains)
        );
        assert!(parse_edge_type(Some("Contains"), EdgeType::SEMANTIC_DEFAULT).is_err());
    }

    #[test]
    fn limit_precedence() {
        assert_eq!(effective_limit(Some(5), Some(10), 20), 5);
        assert_eq!(effective_limit(None, Some(10), 20), 10);
        assert_eq!(effective_limit(None, None, 20), 20);
    }
}
