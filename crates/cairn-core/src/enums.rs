//! Entity types, relationship tags, hook types, and risk levels for Cairn.
//!
//! Most enums serialize as `snake_case`. The graph relation taxonomy is the
//! exception: it uses `SCREAMING_SNAKE_CASE` so it can never collide with a
//! structural relationship type on the wire.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// The kind of node an entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    File,
    Module,
    Function,
    Class,
    Method,
    Property,
    Interface,
    TypeAlias,
    Enum,
    Variable,
    Constant,
    Concept,
    Technology,
    Pattern,
    Requirement,
    Document,
    Decision,
}

impl EntityType {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Module => "module",
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Property => "property",
            Self::Interface => "interface",
            Self::TypeAlias => "type_alias",
            Self::Enum => "enum",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Concept => "concept",
            Self::Technology => "technology",
            Self::Pattern => "pattern",
            Self::Requirement => "requirement",
            Self::Document => "document",
            Self::Decision => "decision",
        }
    }

    /// Types scanned by semantic discovery when the caller does not say otherwise.
    pub const DISCOVERY_DEFAULTS: &'static [Self] = &[
        Self::Function,
        Self::Class,
        Self::Requirement,
        Self::Concept,
        Self::Document,
    ];

    /// Candidate types for concept lookups.
    pub const CONCEPTUAL: &'static [Self] = &[Self::Concept, Self::Technology, Self::Pattern];
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RelationshipType
// ---------------------------------------------------------------------------

/// Structural relationship types produced by code extraction.
///
/// This is a closed set shared with other tools reading the graph; the wire
/// strings must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Imports,
    Exports,
    Calls,
    Extends,
    Implements,
    UsesType,
    Contains,
    Instantiates,
    References,
}

impl RelationshipType {
    pub const ALL: &'static [Self] = &[
        Self::Imports,
        Self::Exports,
        Self::Calls,
        Self::Extends,
        Self::Implements,
        Self::UsesType,
        Self::Contains,
        Self::Instantiates,
        Self::References,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Exports => "exports",
            Self::Calls => "calls",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::UsesType => "uses_type",
            Self::Contains => "contains",
            Self::Instantiates => "instantiates",
            Self::References => "references",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GraphRelation
// ---------------------------------------------------------------------------

/// Relation taxonomy used by semantic linking and decision/impact discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphRelation {
    Contains,
    Calls,
    Imports,
    Implements,
    Extends,
    Mentions,
    RelatesTo,
    DependsOn,
    DefinedIn,
    Uses,
    References,
    Documents,
    Configures,
    Tests,
}

impl GraphRelation {
    pub const ALL: &'static [Self] = &[
        Self::Contains,
        Self::Calls,
        Self::Imports,
        Self::Implements,
        Self::Extends,
        Self::Mentions,
        Self::RelatesTo,
        Self::DependsOn,
        Self::DefinedIn,
        Self::Uses,
        Self::References,
        Self::Documents,
        Self::Configures,
        Self::Tests,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::Calls => "CALLS",
            Self::Imports => "IMPORTS",
            Self::Implements => "IMPLEMENTS",
            Self::Extends => "EXTENDS",
            Self::Mentions => "MENTIONS",
            Self::RelatesTo => "RELATES_TO",
            Self::DependsOn => "DEPENDS_ON",
            Self::DefinedIn => "DEFINED_IN",
            Self::Uses => "USES",
            Self::References => "REFERENCES",
            Self::Documents => "DOCUMENTS",
            Self::Configures => "CONFIGURES",
            Self::Tests => "TESTS",
        }
    }
}

impl fmt::Display for GraphRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EdgeType
// ---------------------------------------------------------------------------

/// The tag stored on a relationship row: either a structural type or a
/// taxonomy relation. Parsing is case-sensitive (`contains` vs `CONTAINS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EdgeType {
    Structural(RelationshipType),
    Graph(GraphRelation),
}

impl EdgeType {
    /// The default tag for similarity edges.
    pub const SEMANTIC_DEFAULT: Self = Self::Graph(GraphRelation::RelatesTo);

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural(r) => r.as_str(),
            Self::Graph(r) => r.as_str(),
        }
    }
}

impl Default for EdgeType {
    fn default() -> Self {
        Self::SEMANTIC_DEFAULT
    }
}

impl From<RelationshipType> for EdgeType {
    fn from(value: RelationshipType) -> Self {
        Self::Structural(value)
    }
}

impl From<GraphRelation> for EdgeType {
    fn from(value: GraphRelation) -> Self {
        Self::Graph(value)
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationshipType::ALL
            .iter()
            .find(|r| r.as_str() == s)
            .map(|r| Self::Structural(*r))
            .or_else(|| {
                GraphRelation::ALL
                    .iter()
                    .find(|r| r.as_str() == s)
                    .map(|r| Self::Graph(*r))
            })
            .ok_or_else(|| format!("unknown relationship type '{s}'"))
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which edges of an entity to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    In,
    Out,
    #[default]
    Both,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HookType
// ---------------------------------------------------------------------------

/// Git lifecycle hook that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum HookType {
    PreCommit,
    PostMerge,
    PrePush,
    PostCheckout,
}

impl HookType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreCommit => "pre-commit",
            Self::PostMerge => "post-merge",
            Self::PrePush => "pre-push",
            Self::PostCheckout => "post-checkout",
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Risk classification of a change set. Ordered low < medium < high.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a risk score: `>= 10` is high, `>= 5` is medium.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        if score >= 10 {
            Self::High
        } else if score >= 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChangeType
// ---------------------------------------------------------------------------

/// How a file changed between two refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
