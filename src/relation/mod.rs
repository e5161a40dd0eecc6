//! Relation module for entity associations.
//!
//! Supported association shapes:
//! - belongs_to: Many-to-one relationship
//! - has_one: One-to-one relationship (optionally polymorphic via `as`)
//! - has_many: One-to-many relationship (optionally polymorphic via `as`)
//! - has_and_belongs_to_many: Many-to-many relationship (via join table)
//!
//! # Architecture
//!
//! - **Types**: `RelationType`, `JoinKind`, `LiteralMode`
//! - **Def**: `Association` metadata and join condition builders
//! - **Identity**: single and composite key columns

pub mod identity;
#[doc(inline)]
pub use identity::{BorrowedIdentityIter, Identity, IntoIdentity};

pub mod types;
#[doc(inline)]
pub use types::{JoinKind, LiteralMode, RelationType};

pub mod def;
#[doc(inline)]
pub use def::{
    bound_literal_expr, inline_literal_expr, join_tbl_on_condition, join_tbl_on_expr, Association,
    JoinTableDef,
};
