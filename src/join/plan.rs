//! Join plans: the ordered output of association translation.

use crate::entity::EntityType;
use crate::relation::JoinKind;
use sea_query::{Alias, Asterisk, Condition, PostgresQueryBuilder, Query, SelectStatement, Value};

/// One step of a join chain
#[derive(Debug, Clone)]
pub struct JoinClause {
    /// Association that produced this clause
    pub association: String,
    pub join_kind: JoinKind,
    /// Table already present in the query
    pub left: String,
    /// Table being joined
    pub right: String,
    /// `ON` predicate
    pub on: Condition,
}

/// Ordered join clauses plus the parameters they bind, in emission order
///
/// Binds are taken from each clause's final `ON` predicate, so values added or
/// removed by an augment hook are reflected here.
#[derive(Debug, Clone, Default)]
pub struct JoinPlan {
    joins: Vec<JoinClause>,
    binds: Vec<Value>,
}

impl JoinPlan {
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinClause> {
        self.joins.iter()
    }

    /// Clauses produced for one association, in emission order
    pub fn clauses_for<'a>(&'a self, association: &'a str) -> impl Iterator<Item = &'a JoinClause> + 'a {
        self.joins.iter().filter(move |c| c.association == association)
    }

    pub fn into_parts(self) -> (Vec<JoinClause>, Vec<Value>) {
        (self.joins, self.binds)
    }

    pub(crate) fn push_clause(&mut self, clause: JoinClause) {
        self.binds.extend(bound_values(&clause.on));
        self.joins.push(clause);
    }

    /// Append another plan, e.g. one translated from an already-joined entity
    ///
    /// ```
    /// use relation_joins::{join_association, EntityType};
    ///
    /// let post = EntityType::new("Post").has_many("comments");
    /// let comment = EntityType::new("Comment").belongs_to("author");
    ///
    /// let mut plan = join_association(&post, "comments").unwrap();
    /// plan.extend(join_association(&comment, "author").unwrap());
    /// assert_eq!(
    ///     plan.to_sql(&post),
    ///     r#"SELECT "posts".* FROM "posts" INNER JOIN "comments" ON "comments"."post_id" = "posts"."id" INNER JOIN "authors" ON "authors"."id" = "comments"."author_id""#
    /// );
    /// ```
    pub fn extend(&mut self, other: JoinPlan) {
        self.joins.extend(other.joins);
        self.binds.extend(other.binds);
    }

    /// Merge every clause into an existing select, in order
    pub fn apply_to(&self, select: &mut SelectStatement) {
        for clause in &self.joins {
            select.join(
                clause.join_kind.into(),
                Alias::new(clause.right.clone()),
                clause.on.clone(),
            );
        }
    }

    /// `SELECT "<table>".* FROM "<table>"` with this plan's joins applied
    pub fn select_from(&self, root: &EntityType) -> SelectStatement {
        let mut select = Query::select();
        select
            .column((Alias::new(root.table.clone()), Asterisk))
            .from(Alias::new(root.table.clone()));
        self.apply_to(&mut select);
        select
    }

    /// PostgreSQL text of [`JoinPlan::select_from`] with values inlined
    pub fn to_sql(&self, root: &EntityType) -> String {
        self.select_from(root).to_string(PostgresQueryBuilder)
    }
}

/// Values a condition binds when built, in placeholder order
fn bound_values(on: &Condition) -> Vec<Value> {
    let (_, values) = Query::select()
        .column(Asterisk)
        .cond_where(on.clone())
        .build(PostgresQueryBuilder);
    values.0
}

impl<'a> IntoIterator for &'a JoinPlan {
    type Item = &'a JoinClause;
    type IntoIter = std::slice::Iter<'a, JoinClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.joins.iter()
    }
}
