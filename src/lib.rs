//! # relation-joins
//!
//! SQL JOIN generation for ORM association graphs, built on SeaQuery.
//!
//! Declare entity types and their associations, then translate one or more
//! association names into a [`JoinPlan`]: ordered join clauses (two for a
//! has_and_belongs_to_many join table) that merge into any SeaQuery
//! `SelectStatement`.
//!
//! ```
//! use relation_joins::{join_association, EntityType};
//!
//! let post = EntityType::new("Post").has_many("comments");
//! let plan = join_association(&post, "comments").unwrap();
//! assert_eq!(
//!     plan.to_sql(&post),
//!     r#"SELECT "posts".* FROM "posts" INNER JOIN "comments" ON "comments"."post_id" = "posts"."id""#
//! );
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod join;
pub mod relation;
pub mod schema;

pub use config::JoinConfig;
pub use entity::EntityType;
pub use error::JoinError;
pub use join::{
    join_association, outer_join, translate, translate_with, JoinClause, JoinPlan, JoinTranslator,
    Relationships,
};
pub use relation::{Association, Identity, JoinKind, LiteralMode, RelationType};
pub use schema::Schema;
