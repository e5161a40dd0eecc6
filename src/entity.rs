//! Entity types and their association declarations.
//!
//! An `EntityType` maps one named type to one table and owns the associations
//! declared on it, in declaration order. The builder methods follow the usual
//! ORM naming conventions (see [`inflector`]); anything unconventional can be
//! declared with [`EntityType::associate`] and an explicit [`Association`].

pub mod inflector;

use crate::error::JoinError;
use crate::join::{self, JoinPlan, Relationships};
use crate::relation::{Association, Identity, IntoIdentity, JoinKind, RelationType};
use serde::{Deserialize, Serialize};

/// A named relation backed by one table
///
/// # Example
///
/// ```
/// use relation_joins::EntityType;
///
/// let post = EntityType::new("Post").has_many("comments").has_many("favorites");
/// assert_eq!(post.table, "posts");
/// assert_eq!(post.associations().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntityDecl")]
pub struct EntityType {
    /// Type name (`"CollabPost"`); also the polymorphic type tag
    pub name: String,
    /// Backing table (`"collab_posts"`)
    pub table: String,
    /// Primary key column(s)
    pub primary_key: Identity,
    associations: Vec<Association>,
}

impl EntityType {
    /// New entity with a conventional table name and an `id` primary key
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: inflector::tableize(&name),
            name,
            primary_key: Identity::Unary("id".to_string()),
            associations: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_primary_key(mut self, primary_key: impl IntoIdentity) -> Self {
        self.primary_key = primary_key.into_identity();
        self
    }

    /// Declare an association with explicit metadata
    ///
    /// A later declaration with the same name replaces the earlier one in place.
    pub fn associate(mut self, association: Association) -> Self {
        match self.associations.iter_mut().find(|a| a.name == association.name) {
            Some(existing) => *existing = association,
            None => self.associations.push(association),
        }
        self
    }

    /// `has_many :comments` -> `"comments"."post_id" = "posts"."id"`
    pub fn has_many(self, name: &str) -> Self {
        let assoc = Association::new(
            name,
            RelationType::HasMany,
            inflector::pluralize(name),
            self.primary_key.clone(),
            inflector::foreign_key(&self.name),
        );
        self.associate(assoc)
    }

    /// `has_one :comment` -> `"comments"."author_id" = "authors"."id"`
    pub fn has_one(self, name: &str) -> Self {
        let assoc = Association::new(
            name,
            RelationType::HasOne,
            inflector::pluralize(name),
            self.primary_key.clone(),
            inflector::foreign_key(&self.name),
        );
        self.associate(assoc)
    }

    /// `belongs_to :author` -> `"authors"."id" = "comments"."author_id"`
    pub fn belongs_to(self, name: &str) -> Self {
        let assoc = Association::new(
            name,
            RelationType::BelongsTo,
            inflector::pluralize(name),
            format!("{name}_id"),
            "id",
        );
        self.associate(assoc)
    }

    /// `has_and_belongs_to_many :authors`, through the lexically named join table
    pub fn has_and_belongs_to_many(self, name: &str) -> Self {
        let to_tbl = inflector::pluralize(name);
        let join_table = inflector::join_table_name(&self.table, &to_tbl);
        let assoc = Association::new(
            name,
            RelationType::HasAndBelongsToMany,
            to_tbl,
            self.primary_key.clone(),
            "id",
        )
        .through(
            join_table,
            inflector::foreign_key(&self.name),
            format!("{}_id", inflector::singularize(name)),
        );
        self.associate(assoc)
    }

    /// `has_one :registration_fee, as: :billable` with `class_name` naming the target type
    pub fn has_one_as(self, name: &str, class_name: &str, as_name: &str) -> Self {
        self.polymorphic_as(name, RelationType::HasOne, class_name, as_name)
    }

    /// `has_many :fees, as: :billable` with `class_name` naming the target type
    pub fn has_many_as(self, name: &str, class_name: &str, as_name: &str) -> Self {
        self.polymorphic_as(name, RelationType::HasMany, class_name, as_name)
    }

    /// `belongs_to :billable, polymorphic: true`
    ///
    /// Recorded for completeness; the target table varies per row so it cannot
    /// be joined.
    pub fn belongs_to_polymorphic(self, name: &str) -> Self {
        let assoc = Association::new(
            name,
            RelationType::BelongsToPolymorphic,
            inflector::pluralize(name),
            format!("{name}_id"),
            "id",
        )
        .polymorphic(format!("{name}_type"));
        self.associate(assoc)
    }

    fn polymorphic_as(self, name: &str, rel_type: RelationType, class_name: &str, as_name: &str) -> Self {
        let assoc = Association::new(
            name,
            rel_type,
            inflector::tableize(class_name),
            self.primary_key.clone(),
            format!("{as_name}_id"),
        )
        .polymorphic(format!("{as_name}_type"));
        self.associate(assoc)
    }

    /// Look up a declared association by name
    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Declared associations in declaration order
    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Inner join plan for one or more associations of this entity
    pub fn join_association<'a>(
        &self,
        relationships: impl Into<Relationships<'a>>,
    ) -> Result<JoinPlan, JoinError> {
        join::join_association(self, relationships)
    }

    /// Join plan of the given kind, ready to merge into a select
    pub fn joins_type<'a>(
        &self,
        relationships: impl Into<Relationships<'a>>,
        join_kind: JoinKind,
    ) -> Result<JoinPlan, JoinError> {
        join::translate(self, relationships, join_kind)
    }

    /// Outer join plan for one or more associations of this entity
    pub fn outer_joins<'a>(
        &self,
        relationships: impl Into<Relationships<'a>>,
    ) -> Result<JoinPlan, JoinError> {
        join::outer_join(self, relationships)
    }
}

#[derive(Deserialize)]
struct EntityDecl {
    name: String,
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    primary_key: Option<Identity>,
    #[serde(default)]
    associations: Vec<Association>,
}

impl From<EntityDecl> for EntityType {
    fn from(decl: EntityDecl) -> Self {
        let mut entity = EntityType::new(decl.name);
        if let Some(table) = decl.table {
            entity.table = table;
        }
        if let Some(primary_key) = decl.primary_key {
            entity.primary_key = primary_key;
        }
        decl.associations
            .into_iter()
            .fold(entity, |entity, assoc| entity.associate(assoc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_many_conventions() {
        let post = EntityType::new("Post").has_many("comments");
        let assoc = post.association("comments").unwrap();

        assert_eq!(assoc.rel_type, RelationType::HasMany);
        assert_eq!(assoc.to_tbl, "comments");
        assert_eq!(assoc.from_col, Identity::Unary("id".into()));
        assert_eq!(assoc.to_col, Identity::Unary("post_id".into()));
    }

    #[test]
    fn test_belongs_to_conventions() {
        let comment = EntityType::new("Comment").belongs_to("author");
        let assoc = comment.association("author").unwrap();

        assert_eq!(assoc.to_tbl, "authors");
        assert_eq!(assoc.from_col, Identity::Unary("author_id".into()));
        assert_eq!(assoc.to_col, Identity::Unary("id".into()));
    }

    #[test]
    fn test_habtm_conventions() {
        let collab = EntityType::new("CollabPost").has_and_belongs_to_many("authors");
        let through = collab.association("authors").unwrap().through.clone().unwrap();

        assert_eq!(collab.table, "collab_posts");
        assert_eq!(through.table, "authors_collab_posts");
        assert_eq!(through.from_fk, Identity::Unary("collab_post_id".into()));
        assert_eq!(through.to_fk, Identity::Unary("author_id".into()));
    }

    #[test]
    fn test_polymorphic_as_conventions() {
        let author = EntityType::new("Author").has_one_as("registration_fee", "Fee", "billable");
        let assoc = author.association("registration_fee").unwrap();

        assert_eq!(assoc.to_tbl, "fees");
        assert_eq!(assoc.to_col, Identity::Unary("billable_id".into()));
        assert_eq!(assoc.polymorphic_type.as_deref(), Some("billable_type"));
    }

    #[test]
    fn test_redeclaring_replaces_in_place() {
        let post = EntityType::new("Post")
            .has_many("comments")
            .has_many("favorites")
            .associate(Association::new("comments", RelationType::HasMany, "remarks", "id", "post_id"));

        let names: Vec<&str> = post.associations().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["comments", "favorites"]);
        assert_eq!(post.association("comments").unwrap().to_tbl, "remarks");
    }

    #[test]
    fn test_custom_table_and_composite_key() {
        let tenant_post = EntityType::new("TenantPost")
            .with_table("posts")
            .with_primary_key(["id", "tenant_id"])
            .has_many("comments");

        assert_eq!(tenant_post.table, "posts");
        assert_eq!(tenant_post.association("comments").unwrap().from_col.arity(), 2);
    }

    #[test]
    fn test_deserialize_fills_conventions() {
        let entity: EntityType = serde_json::from_str(
            r#"{
                "name": "Post",
                "associations": [
                    {"name": "comments", "rel_type": "has_many", "to_tbl": "comments",
                     "from_col": "id", "to_col": "post_id"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(entity.table, "posts");
        assert_eq!(entity.primary_key, Identity::Unary("id".into()));
        assert!(entity.association("comments").is_some());
    }
}
