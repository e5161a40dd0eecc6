//! Association definitions and join condition builders
//!
//! An `Association` is fully resolved metadata: target table and key columns
//! are already known, so translation never needs to look anything else up.
//! Every predicate is written `right.to_col = left.from_col`, which covers both
//! directions:
//!
//! - has_many / has_one: `"comments"."post_id" = "posts"."id"`
//! - belongs_to: `"authors"."id" = "comments"."author_id"`

use super::identity::{Identity, IntoIdentity};
use super::types::RelationType;
use sea_query::{Alias, Condition, Expr, ExprTrait, Value};
use serde::{Deserialize, Serialize};

/// Defines one declared relationship from a source entity to a target
///
/// # Example
///
/// ```
/// use relation_joins::relation::{Association, RelationType};
///
/// // Post has_many comments
/// let assoc = Association::new("comments", RelationType::HasMany, "comments", "id", "post_id");
/// assert_eq!(assoc.to_tbl, "comments");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Association name, as used by callers (`"comments"`)
    pub name: String,
    /// Type of relationship
    pub rel_type: RelationType,
    /// Target table
    pub to_tbl: String,
    /// Column(s) on the source table (or the source primary key for join-table associations)
    pub from_col: Identity,
    /// Column(s) on the target table
    pub to_col: Identity,
    /// Join table for has_and_belongs_to_many
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<JoinTableDef>,
    /// Type-tag column on the target table for polymorphic `as:` associations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polymorphic_type: Option<String>,
}

/// Intermediate table of a many-to-many association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTableDef {
    /// Join table name (`authors_collab_posts`)
    pub table: String,
    /// Column(s) in the join table pointing at the source (`collab_post_id`)
    pub from_fk: Identity,
    /// Column(s) in the join table pointing at the target (`author_id`)
    pub to_fk: Identity,
}

impl Association {
    pub fn new(
        name: impl Into<String>,
        rel_type: RelationType,
        to_tbl: impl Into<String>,
        from_col: impl IntoIdentity,
        to_col: impl IntoIdentity,
    ) -> Self {
        Self {
            name: name.into(),
            rel_type,
            to_tbl: to_tbl.into(),
            from_col: from_col.into_identity(),
            to_col: to_col.into_identity(),
            through: None,
            polymorphic_type: None,
        }
    }

    /// Route this association through a join table
    pub fn through(
        mut self,
        table: impl Into<String>,
        from_fk: impl IntoIdentity,
        to_fk: impl IntoIdentity,
    ) -> Self {
        self.through = Some(JoinTableDef {
            table: table.into(),
            from_fk: from_fk.into_identity(),
            to_fk: to_fk.into_identity(),
        });
        self
    }

    /// Restrict the target rows by a type-tag column (`as: :billable`)
    pub fn polymorphic(mut self, type_column: impl Into<String>) -> Self {
        self.polymorphic_type = Some(type_column.into());
        self
    }

    pub fn is_polymorphic(&self) -> bool {
        self.polymorphic_type.is_some()
    }
}

/// Build `to_tbl.to_col = from_tbl.from_col` for every column pair
///
/// Callers are expected to have checked that both sides have the same arity;
/// surplus columns on the longer side are ignored.
///
/// ```
/// use relation_joins::relation::{join_tbl_on_condition, Identity};
/// use sea_query::{PostgresQueryBuilder, Query, Asterisk};
///
/// let on = join_tbl_on_condition(
///     "comments",
///     &Identity::Unary("post_id".into()),
///     "posts",
///     &Identity::Unary("id".into()),
/// );
/// let sql = Query::select()
///     .column(Asterisk)
///     .from("posts")
///     .cond_where(on)
///     .to_string(PostgresQueryBuilder);
/// assert!(sql.contains(r#""comments"."post_id" = "posts"."id""#));
/// ```
pub fn join_tbl_on_condition(
    to_tbl: &str,
    to_col: &Identity,
    from_tbl: &str,
    from_col: &Identity,
) -> Condition {
    to_col
        .iter()
        .zip(from_col.iter())
        .fold(Condition::all(), |condition, (to, from)| {
            condition.add(join_tbl_on_expr(to_tbl, to, from_tbl, from))
        })
}

/// Single column equality between two tables
pub fn join_tbl_on_expr(to_tbl: &str, to_col: &str, from_tbl: &str, from_col: &str) -> Expr {
    Expr::col((Alias::new(to_tbl.to_string()), Alias::new(to_col.to_string())))
        .equals((Alias::new(from_tbl.to_string()), Alias::new(from_col.to_string())))
}

/// `tbl.col = '<literal>'` with the literal quoted into the SQL text
///
/// The right-hand side is a constant, so it is escaped by the query builder
/// and never shows up among the statement's bound values.
pub fn inline_literal_expr(tbl: &str, col: &str, literal: &str) -> Expr {
    Expr::col((Alias::new(tbl.to_string()), Alias::new(col.to_string())))
        .eq(Expr::Constant(Value::from(literal.to_string())))
}

/// `tbl.col = $n` with the literal as a bound value
pub fn bound_literal_expr(tbl: &str, col: &str, literal: &str) -> Expr {
    Expr::col((Alias::new(tbl.to_string()), Alias::new(col.to_string())))
        .eq(Expr::val(literal.to_string()))
}
