//! Serde roundtrip and JsonSchema validation tests for the persisted record types.

use cairn_core::entities::*;
use cairn_core::enums::*;
use cairn_core::outcome::{Issue, Severity};
use chrono::Utc;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    entity_roundtrip,
    Entity,
    Entity {
        id: "ent-a3f8b2c1".into(),
        entity_type: EntityType::Function,
        name: "login".into(),
        qualified_name: "src/auth.ts:login".into(),
        content: Some("export function login(user: User) {}".into()),
        summary: None,
        file_path: Some("src/auth.ts".into()),
        start_line: Some(3),
        end_line: Some(9),
        metadata: serde_json::Map::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    semantic_relationship_roundtrip,
    Relationship,
    Relationship {
        id: "rel-0badcafe".into(),
        source_id: "ent-a3f8b2c1".into(),
        target_id: "ent-b4e9c3d2".into(),
        relationship: EdgeType::SEMANTIC_DEFAULT,
        weight: 0.875,
        metadata: semantic_metadata(0.875),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    structural_relationship_roundtrip,
    Relationship,
    Relationship {
        id: "rel-00c0ffee".into(),
        source_id: "ent-a3f8b2c1".into(),
        target_id: "ent-b4e9c3d2".into(),
        relationship: RelationshipType::UsesType.into(),
        weight: 1.0,
        metadata: serde_json::Map::new(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    hook_execution_roundtrip,
    HookExecution,
    HookExecution {
        id: "hke-12345678".into(),
        project_id: "demo".into(),
        hook_type: HookType::PostMerge,
        timestamp: Utc::now(),
        repository: "/work/demo".into(),
        branch: Some("main".into()),
        commit_hash: Some("9fceb02".into()),
        duration_ms: 412,
        success: false,
        files_indexed: 0,
        entities_updated: 0,
        message: "index_files failed".into(),
        warnings: vec![],
        errors: vec!["connection refused".into()],
    }
);

roundtrip_and_validate!(
    impact_report_roundtrip,
    ImpactReport,
    ImpactReport {
        generated_at: Utc::now(),
        base_branch: "main".into(),
        target_branch: "feature/auth".into(),
        changed_files: ChangedFiles {
            added: vec!["src/token.ts".into()],
            modified: vec![],
            deleted: vec!["src/session.ts".into()],
        },
        affected_entities: vec![AffectedEntity {
            id: "ent-1".into(),
            name: "Session".into(),
            entity_type: "class".into(),
            file_path: "src/session.ts".into(),
            change_type: ChangeType::Deleted,
            usage_count: 12,
        }],
        affected_decisions: vec![AffectedDecision {
            id: "dec-1".into(),
            title: "Cookie sessions".into(),
            summary: "Sessions live in session.ts".into(),
            related_files: vec!["src/session.ts".into()],
            might_be_invalidated: true,
        }],
        related_contexts: vec![RelatedContext {
            source: "docs/auth.md".into(),
            content: "Token rotation".into(),
            score: Some(0.5),
        }],
        risk_level: RiskLevel::High,
        risk_score: 7,
        reasons: vec!["1 files deleted".into()],
        suggestions: vec![],
    }
);

roundtrip_and_validate!(
    issue_roundtrip,
    Issue,
    Issue {
        severity: Severity::Recoverable,
        context: "ent-1".into(),
        message: "similarity search failed".into(),
    }
);
