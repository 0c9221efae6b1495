//! ID prefix constants.
//!
//! IDs are generated by the store as `{prefix}-{8 hex chars}`, e.g. `ent-a3f8b2c1`.

pub const PREFIX_ENTITY: &str = "ent";
pub const PREFIX_RELATIONSHIP: &str = "rel";
pub const PREFIX_HOOK_EXECUTION: &str = "hke";
pub const PREFIX_IMPACT_REPORT: &str = "imp";

/// Every prefix issued by the store.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ENTITY,
    PREFIX_RELATIONSHIP,
    PREFIX_HOOK_EXECUTION,
    PREFIX_IMPACT_REPORT,
];
