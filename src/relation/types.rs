//! Relation and join type definitions.

use serde::{Deserialize, Serialize};

/// Type of relationship between entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// One-to-one relationship, foreign key on the target table
    HasOne,
    /// One-to-many relationship, foreign key on the target table
    HasMany,
    /// Many-to-one relationship (`belongs_to`), foreign key on the source table
    BelongsTo,
    /// Many-to-many relationship through a join table
    HasAndBelongsToMany,
    /// `belongs_to` whose target table is chosen per row by a type column.
    ///
    /// Declarable so schemas can describe it, but it has no single join
    /// predicate and translation rejects it.
    BelongsToPolymorphic,
}

impl RelationType {
    /// Number of join clauses one association of this type contributes
    pub fn clause_count(&self) -> usize {
        match self {
            Self::HasAndBelongsToMany => 2,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasOne => "has_one",
            Self::HasMany => "has_many",
            Self::BelongsTo => "belongs_to",
            Self::HasAndBelongsToMany => "has_and_belongs_to_many",
            Self::BelongsToPolymorphic => "belongs_to_polymorphic",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of SQL join emitted for an association
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// `INNER JOIN`
    #[default]
    Inner,
    /// `LEFT JOIN`
    Outer,
}

impl From<JoinKind> for sea_query::JoinType {
    fn from(kind: JoinKind) -> Self {
        match kind {
            JoinKind::Inner => sea_query::JoinType::InnerJoin,
            JoinKind::Outer => sea_query::JoinType::LeftJoin,
        }
    }
}

/// How the translator emits literal values it generates itself
/// (currently only the polymorphic type tag).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralMode {
    /// Quote the literal into the predicate text: `"fees"."billable_type" = 'Author'`
    #[default]
    Inline,
    /// Emit a bound parameter and record it in `JoinPlan::binds`
    Bind,
}
