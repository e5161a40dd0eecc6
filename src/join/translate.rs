//! Association to join translation.
//!
//! Each requested association becomes one join clause, or two for
//! has_and_belongs_to_many (source to join table, then join table to target).
//! Clauses are emitted grouped by association, in the order the caller named
//! them.
//!
//! The optional augment hook is called once per association with its name and
//! generated predicate, and whatever it returns replaces the predicate. For
//! has_and_belongs_to_many only the second (join table to target) predicate is
//! passed to the hook; the join-table predicate is always emitted unchanged.

use super::plan::{JoinClause, JoinPlan};
use crate::config::JoinConfig;
use crate::entity::EntityType;
use crate::error::JoinError;
use crate::relation::{
    bound_literal_expr, inline_literal_expr, join_tbl_on_condition, Association, Identity, JoinKind,
    LiteralMode, RelationType,
};
use sea_query::Condition;

/// Hook that rewrites the predicate generated for an association
pub type AugmentFn<'h> = dyn FnMut(&str, Condition) -> Condition + 'h;

/// Association names to translate, in join order
///
/// Built from a single name or any ordered collection of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationships<'a>(Vec<&'a str>);

impl<'a> Relationships<'a> {
    pub fn names(&self) -> &[&'a str] {
        &self.0
    }
}

impl<'a> From<&'a str> for Relationships<'a> {
    fn from(name: &'a str) -> Self {
        Self(vec![name])
    }
}

impl<'a> From<&'a String> for Relationships<'a> {
    fn from(name: &'a String) -> Self {
        Self(vec![name.as_str()])
    }
}

impl<'a> From<&'a [&'a str]> for Relationships<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Self(names.to_vec())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Relationships<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Self(names.to_vec())
    }
}

impl<'a> From<Vec<&'a str>> for Relationships<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        Self(names)
    }
}

impl<'a> From<&'a [String]> for Relationships<'a> {
    fn from(names: &'a [String]) -> Self {
        Self(names.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Relationships<'a> {
    fn from(names: &'a Vec<String>) -> Self {
        Self::from(names.as_slice())
    }
}

/// Translates entity associations into join plans
///
/// Holds no state besides its configuration; one translator can be shared
/// freely.
#[derive(Debug, Clone, Default)]
pub struct JoinTranslator {
    config: JoinConfig,
}

impl JoinTranslator {
    pub fn new(config: JoinConfig) -> Self {
        Self { config }
    }

    /// Translate with the configured default join kind
    pub fn join_association<'a>(
        &self,
        root: &EntityType,
        relationships: impl Into<Relationships<'a>>,
    ) -> Result<JoinPlan, JoinError> {
        self.translate(root, relationships, self.config.default_join_kind)
    }

    pub fn translate<'a>(
        &self,
        root: &EntityType,
        relationships: impl Into<Relationships<'a>>,
        join_kind: JoinKind,
    ) -> Result<JoinPlan, JoinError> {
        self.translate_inner(root, &relationships.into(), join_kind, None)
    }

    /// Translate, passing each association's predicate through `augment`
    ///
    /// ```
    /// use relation_joins::{EntityType, JoinKind, JoinTranslator};
    /// use sea_query::{Alias, Expr, ExprTrait};
    ///
    /// let post = EntityType::new("Post").has_many("comments");
    /// let plan = JoinTranslator::default()
    ///     .translate_with(&post, "comments", JoinKind::Inner, |_name, on| {
    ///         on.add(Expr::col((Alias::new("comments"), Alias::new("id"))).eq(Expr::val(10)))
    ///     })
    ///     .unwrap();
    /// assert_eq!(
    ///     plan.to_sql(&post),
    ///     r#"SELECT "posts".* FROM "posts" INNER JOIN "comments" ON "comments"."post_id" = "posts"."id" AND "comments"."id" = 10"#
    /// );
    /// ```
    pub fn translate_with<'a, F>(
        &self,
        root: &EntityType,
        relationships: impl Into<Relationships<'a>>,
        join_kind: JoinKind,
        mut augment: F,
    ) -> Result<JoinPlan, JoinError>
    where
        F: FnMut(&str, Condition) -> Condition,
    {
        let augment: &mut AugmentFn<'_> = &mut augment;
        self.translate_inner(root, &relationships.into(), join_kind, Some(augment))
    }

    pub fn outer_join<'a>(
        &self,
        root: &EntityType,
        relationships: impl Into<Relationships<'a>>,
    ) -> Result<JoinPlan, JoinError> {
        self.translate(root, relationships, JoinKind::Outer)
    }

    fn translate_inner(
        &self,
        root: &EntityType,
        relationships: &Relationships<'_>,
        join_kind: JoinKind,
        mut augment: Option<&mut AugmentFn<'_>>,
    ) -> Result<JoinPlan, JoinError> {
        #[cfg(feature = "tracing")]
        let _span = super::tracing_helpers::translate_span(&root.name, relationships.names()).entered();

        let mut plan = JoinPlan::default();
        for name in relationships.names() {
            let assoc = root
                .association(name)
                .ok_or_else(|| JoinError::UnknownAssociation {
                    entity: root.name.clone(),
                    name: name.to_string(),
                })?;
            let before = plan.len();
            self.plan_association(root, assoc, join_kind, augment.as_deref_mut(), &mut plan)?;
            debug_assert_eq!(plan.len() - before, assoc.rel_type.clause_count());
        }

        log::debug!(
            "Translated {:?} on {} into {} join clause(s)",
            relationships.names(),
            root.name,
            plan.len()
        );
        Ok(plan)
    }

    fn plan_association(
        &self,
        root: &EntityType,
        assoc: &Association,
        join_kind: JoinKind,
        augment: Option<&mut AugmentFn<'_>>,
        plan: &mut JoinPlan,
    ) -> Result<(), JoinError> {
        match assoc.rel_type {
            RelationType::HasOne | RelationType::HasMany => {
                check_arity(&assoc.name, &assoc.to_col, &assoc.from_col)?;
                let mut on = join_tbl_on_condition(&assoc.to_tbl, &assoc.to_col, &root.table, &assoc.from_col);
                if let Some(type_col) = &assoc.polymorphic_type {
                    on = on.add(self.type_tag_expr(&assoc.to_tbl, type_col, &root.name));
                }
                let on = apply_augment(augment, &assoc.name, on)?;
                plan.push_clause(clause(assoc, join_kind, &root.table, &assoc.to_tbl, on));
            }
            RelationType::BelongsTo if assoc.polymorphic_type.is_none() => {
                check_arity(&assoc.name, &assoc.to_col, &assoc.from_col)?;
                let on = join_tbl_on_condition(&assoc.to_tbl, &assoc.to_col, &root.table, &assoc.from_col);
                let on = apply_augment(augment, &assoc.name, on)?;
                plan.push_clause(clause(assoc, join_kind, &root.table, &assoc.to_tbl, on));
            }
            RelationType::HasAndBelongsToMany if assoc.polymorphic_type.is_none() => {
                let through = assoc.through.as_ref().ok_or_else(|| unsupported(assoc))?;
                check_arity(&assoc.name, &through.from_fk, &assoc.from_col)?;
                check_arity(&assoc.name, &assoc.to_col, &through.to_fk)?;

                let to_join_table =
                    join_tbl_on_condition(&through.table, &through.from_fk, &root.table, &assoc.from_col);
                let to_target = join_tbl_on_condition(&assoc.to_tbl, &assoc.to_col, &through.table, &through.to_fk);
                let to_target = apply_augment(augment, &assoc.name, to_target)?;

                plan.push_clause(clause(assoc, join_kind, &root.table, &through.table, to_join_table));
                plan.push_clause(clause(assoc, join_kind, &through.table, &assoc.to_tbl, to_target));
            }
            _ => return Err(unsupported(assoc)),
        }
        Ok(())
    }

    /// `to_tbl.type_col = '<type_name>'`, bound or inlined per the literal mode
    fn type_tag_expr(&self, to_tbl: &str, type_col: &str, type_name: &str) -> sea_query::Expr {
        match self.config.literal_mode {
            LiteralMode::Inline => inline_literal_expr(to_tbl, type_col, type_name),
            LiteralMode::Bind => bound_literal_expr(to_tbl, type_col, type_name),
        }
    }
}

fn clause(assoc: &Association, join_kind: JoinKind, left: &str, right: &str, on: Condition) -> JoinClause {
    JoinClause {
        association: assoc.name.clone(),
        join_kind,
        left: left.to_string(),
        right: right.to_string(),
        on,
    }
}

fn apply_augment(
    augment: Option<&mut AugmentFn<'_>>,
    name: &str,
    on: Condition,
) -> Result<Condition, JoinError> {
    let Some(augment) = augment else {
        return Ok(on);
    };
    let on = augment(name, on);
    if on.is_empty() {
        return Err(JoinError::InvalidAugmentResult(name.to_string()));
    }
    Ok(on)
}

fn check_arity(name: &str, left: &Identity, right: &Identity) -> Result<(), JoinError> {
    if left.arity() != right.arity() || left.arity() == 0 {
        return Err(JoinError::KeyArityMismatch {
            name: name.to_string(),
            left: left.arity(),
            right: right.arity(),
        });
    }
    Ok(())
}

fn unsupported(assoc: &Association) -> JoinError {
    JoinError::UnsupportedCardinality {
        name: assoc.name.clone(),
        rel_type: assoc.rel_type,
    }
}

/// Translate `relationships` of `root` with the default configuration
pub fn translate<'a>(
    root: &EntityType,
    relationships: impl Into<Relationships<'a>>,
    join_kind: JoinKind,
) -> Result<JoinPlan, JoinError> {
    JoinTranslator::default().translate(root, relationships, join_kind)
}

/// [`translate`] with an augment hook
pub fn translate_with<'a, F>(
    root: &EntityType,
    relationships: impl Into<Relationships<'a>>,
    join_kind: JoinKind,
    augment: F,
) -> Result<JoinPlan, JoinError>
where
    F: FnMut(&str, Condition) -> Condition,
{
    JoinTranslator::default().translate_with(root, relationships, join_kind, augment)
}

/// Inner join plan, the default join kind
pub fn join_association<'a>(
    root: &EntityType,
    relationships: impl Into<Relationships<'a>>,
) -> Result<JoinPlan, JoinError> {
    translate(root, relationships, JoinKind::Inner)
}

/// `translate(root, relationships, JoinKind::Outer)`
pub fn outer_join<'a>(
    root: &EntityType,
    relationships: impl Into<Relationships<'a>>,
) -> Result<JoinPlan, JoinError> {
    translate(root, relationships, JoinKind::Outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{Alias, Expr, ExprTrait, PostgresQueryBuilder};

    fn post() -> EntityType {
        EntityType::new("Post").has_many("comments").has_many("favorites")
    }

    fn author() -> EntityType {
        EntityType::new("Author")
            .has_one("comment")
            .has_and_belongs_to_many("collab_posts")
            .has_one_as("registration_fee", "Fee", "billable")
    }

    #[test]
    fn test_relationships_normalisation() {
        assert_eq!(Relationships::from("comments").names(), &["comments"]);
        assert_eq!(
            Relationships::from(["comments", "favorites"]).names(),
            &["comments", "favorites"]
        );
        let owned = vec!["favorites".to_string(), "comments".to_string()];
        assert_eq!(Relationships::from(&owned).names(), &["favorites", "comments"]);
    }

    #[test]
    fn test_direct_association_single_clause() {
        let plan = translate(&post(), "comments", JoinKind::Inner).unwrap();

        assert_eq!(plan.len(), 1);
        let clause = &plan.joins()[0];
        assert_eq!(clause.association, "comments");
        assert_eq!(clause.join_kind, JoinKind::Inner);
        assert_eq!(clause.left, "posts");
        assert_eq!(clause.right, "comments");
        assert!(plan.binds().is_empty());
    }

    #[test]
    fn test_has_one_predicate() {
        let plan = join_association(&author(), "comment").unwrap();
        assert_eq!(
            plan.to_sql(&author()),
            r#"SELECT "authors".* FROM "authors" INNER JOIN "comments" ON "comments"."author_id" = "authors"."id""#
        );
    }

    #[test]
    fn test_order_follows_input_not_declaration() {
        let plan = translate(&post(), ["favorites", "comments"], JoinKind::Inner).unwrap();
        let rights: Vec<&str> = plan.iter().map(|c| c.right.as_str()).collect();
        assert_eq!(rights, vec!["favorites", "comments"]);
    }

    #[test]
    fn test_habtm_two_clauses_in_order() {
        let plan = translate(&author(), "collab_posts", JoinKind::Outer).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.joins()[0].left, "authors");
        assert_eq!(plan.joins()[0].right, "authors_collab_posts");
        assert_eq!(plan.joins()[1].left, "authors_collab_posts");
        assert_eq!(plan.joins()[1].right, "collab_posts");
        assert!(plan.iter().all(|c| c.join_kind == JoinKind::Outer));
    }

    #[test]
    fn test_unknown_association_yields_no_plan() {
        let err = translate(&post(), ["comments", "nonexistent"], JoinKind::Inner).unwrap_err();
        assert_eq!(
            err,
            JoinError::UnknownAssociation {
                entity: "Post".to_string(),
                name: "nonexistent".to_string(),
            }
        );
    }

    #[test]
    fn test_polymorphic_belongs_to_is_unsupported() {
        let fee = EntityType::new("RegistrationFee")
            .with_table("fees")
            .belongs_to_polymorphic("billable");
        let err = join_association(&fee, "billable").unwrap_err();
        assert!(matches!(
            err,
            JoinError::UnsupportedCardinality { rel_type: RelationType::BelongsToPolymorphic, .. }
        ));
    }

    #[test]
    fn test_habtm_without_join_table_is_unsupported() {
        let broken = EntityType::new("Author").associate(Association::new(
            "collab_posts",
            RelationType::HasAndBelongsToMany,
            "collab_posts",
            "id",
            "id",
        ));
        let err = join_association(&broken, "collab_posts").unwrap_err();
        assert!(matches!(err, JoinError::UnsupportedCardinality { .. }));
    }

    #[test]
    fn test_key_arity_mismatch() {
        let tenant_post = EntityType::new("Post").associate(Association::new(
            "comments",
            RelationType::HasMany,
            "comments",
            ["id", "tenant_id"],
            "post_id",
        ));
        let err = join_association(&tenant_post, "comments").unwrap_err();
        assert_eq!(
            err,
            JoinError::KeyArityMismatch {
                name: "comments".to_string(),
                left: 1,
                right: 2,
            }
        );
    }

    #[test]
    fn test_identity_hook_matches_no_hook() {
        let root = author();
        let names = ["comment", "collab_posts", "registration_fee"];

        let plain = translate(&root, names, JoinKind::Inner).unwrap();
        let hooked = translate_with(&root, names, JoinKind::Inner, |_, on| on).unwrap();

        assert_eq!(plain.to_sql(&root), hooked.to_sql(&root));
        assert_eq!(plain.binds(), hooked.binds());
    }

    #[test]
    fn test_hook_fires_once_per_association() {
        let mut seen = Vec::new();
        let plan = translate_with(&author(), ["collab_posts", "comment"], JoinKind::Inner, |name, on| {
            seen.push(name.to_string());
            on
        })
        .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(seen, vec!["collab_posts", "comment"]);
    }

    #[test]
    fn test_hook_only_touches_second_habtm_predicate() {
        let root = author();
        let plan = translate_with(&root, "collab_posts", JoinKind::Inner, |_, on| {
            on.add(Expr::col((Alias::new("collab_posts"), Alias::new("id"))).eq(Expr::val(7)))
        })
        .unwrap();

        let sql = plan.to_sql(&root);
        assert!(sql.contains(
            r#"INNER JOIN "authors_collab_posts" ON "authors_collab_posts"."author_id" = "authors"."id" INNER JOIN"#
        ), "{sql}");
        assert!(sql.ends_with(r#""collab_posts"."id" = "authors_collab_posts"."collab_post_id" AND "collab_posts"."id" = 7"#), "{sql}");
    }

    #[test]
    fn test_empty_hook_result_is_rejected() {
        let err = translate_with(&post(), "comments", JoinKind::Inner, |_, _| Condition::all()).unwrap_err();
        assert_eq!(err, JoinError::InvalidAugmentResult("comments".to_string()));
    }

    #[test]
    fn test_bind_mode_collects_type_tag() {
        let root = author();
        let translator = JoinTranslator::new(JoinConfig {
            literal_mode: LiteralMode::Bind,
            ..JoinConfig::default()
        });
        let plan = translator
            .translate(&root, ["comment", "registration_fee"], JoinKind::Inner)
            .unwrap();

        assert_eq!(plan.binds(), &[sea_query::Value::from("Author".to_string())]);

        let (sql, values) = plan.select_from(&root).build(PostgresQueryBuilder);
        assert!(sql.ends_with(r#""fees"."billable_type" = $1"#), "{sql}");
        assert_eq!(values.0, plan.binds().to_vec());
    }

    fn bind_translator() -> JoinTranslator {
        JoinTranslator::new(JoinConfig {
            literal_mode: LiteralMode::Bind,
            ..JoinConfig::default()
        })
    }

    #[test]
    fn test_bind_mode_keeps_values_added_by_hook() {
        let root = author();
        let plan = bind_translator()
            .translate_with(&root, "registration_fee", JoinKind::Inner, |_, on| {
                on.add(Expr::col((Alias::new("fees"), Alias::new("amount"))).eq(Expr::val(10)))
            })
            .unwrap();

        assert_eq!(
            plan.binds(),
            &[sea_query::Value::from("Author".to_string()), sea_query::Value::from(10)]
        );
        let (_, values) = plan.select_from(&root).build(PostgresQueryBuilder);
        assert_eq!(values.0, plan.binds().to_vec());
    }

    #[test]
    fn test_bind_mode_drops_values_replaced_by_hook() {
        let root = author();
        let plan = bind_translator()
            .translate_with(&root, "registration_fee", JoinKind::Inner, |_, _| {
                Condition::all().add(
                    Expr::col((Alias::new("fees"), Alias::new("billable_id")))
                        .equals((Alias::new("authors"), Alias::new("id"))),
                )
            })
            .unwrap();

        assert!(plan.binds().is_empty());
        let (sql, values) = plan.select_from(&root).build(PostgresQueryBuilder);
        assert!(!sql.contains("$1"), "{sql}");
        assert!(values.0.is_empty());
    }

    #[test]
    fn test_bind_mode_orders_values_across_habtm_clauses() {
        let root = author();
        let plan = bind_translator()
            .translate_with(&root, ["collab_posts", "registration_fee"], JoinKind::Inner, |name, on| {
                match name {
                    "collab_posts" => on.add(Expr::col((Alias::new("collab_posts"), Alias::new("id"))).eq(Expr::val(7))),
                    _ => on,
                }
            })
            .unwrap();

        assert_eq!(
            plan.binds(),
            &[sea_query::Value::from(7), sea_query::Value::from("Author".to_string())]
        );
        let (_, values) = plan.select_from(&root).build(PostgresQueryBuilder);
        assert_eq!(values.0, plan.binds().to_vec());
    }

    #[test]
    fn test_translator_default_join_kind_from_config() {
        let translator = JoinTranslator::new(JoinConfig {
            default_join_kind: JoinKind::Outer,
            ..JoinConfig::default()
        });
        let plan = translator.join_association(&post(), "comments").unwrap();
        assert_eq!(plan.joins()[0].join_kind, JoinKind::Outer);

        let plan = translator.outer_join(&post(), "favorites").unwrap();
        assert_eq!(plan.joins()[0].join_kind, JoinKind::Outer);
    }
}
