//! Error type for join translation.

use crate::relation::RelationType;
use std::fmt;

/// Error returned when an association cannot be turned into a join plan
///
/// A failed translation never yields a partial plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// No entity type is registered under this name
    UnknownEntity(String),
    /// The name does not resolve to an association declared on the entity
    UnknownAssociation { entity: String, name: String },
    /// The association's shape has no single join predicate
    UnsupportedCardinality { name: String, rel_type: RelationType },
    /// Key columns on the two sides of a join differ in count
    KeyArityMismatch {
        name: String,
        left: usize,
        right: usize,
    },
    /// The augment hook returned a predicate with no terms
    InvalidAugmentResult(String),
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::UnknownEntity(name) => write!(f, "Unknown entity type {name}"),
            JoinError::UnknownAssociation { entity, name } => {
                write!(f, "Unknown association {name} on {entity}")
            }
            JoinError::UnsupportedCardinality { name, rel_type } => {
                write!(f, "Unsupported cardinality {rel_type} for association {name}")
            }
            JoinError::KeyArityMismatch { name, left, right } => write!(
                f,
                "Key arity mismatch for association {name}: {left} column(s) against {right}"
            ),
            JoinError::InvalidAugmentResult(name) => {
                write!(f, "Augment hook returned an empty predicate for association {name}")
            }
        }
    }
}

impl std::error::Error for JoinError {}
