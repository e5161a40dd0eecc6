//! Identity enum for representing single and composite column references
//!
//! Key columns on either side of an association are stored as an `Identity`, so
//! a composite foreign key joins on every column pair instead of only the first.

use serde::{Deserialize, Serialize};

/// Represents a column list that can be single or composite
///
/// - Single column keys (`Unary`)
/// - Two column composite keys (`Binary`)
/// - Three column composite keys (`Ternary`)
/// - Four or more column composite keys (`Many`)
///
/// Serialized as a plain list of column names (`["id", "tenant_id"]`) or, for
/// the common single-column case, a bare string (`"id"`).
///
/// # Example
///
/// ```
/// use relation_joins::relation::identity::Identity;
///
/// let identity = Identity::Unary("id".to_string());
/// assert_eq!(identity.arity(), 1);
///
/// let identity = Identity::Binary("id".to_string(), "tenant_id".to_string());
/// assert_eq!(identity.arity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IdentityRepr", into = "IdentityRepr")]
pub enum Identity {
    /// Single column identifier
    Unary(String),
    /// Two column identifiers (composite key)
    Binary(String, String),
    /// Three column identifiers (composite key)
    Ternary(String, String, String),
    /// Four or more column identifiers (composite key)
    Many(Vec<String>),
}

impl Identity {
    /// Get the arity (number of columns) for this identity
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_, _) => 2,
            Self::Ternary(_, _, _) => 3,
            Self::Many(vec) => vec.len(),
        }
    }

    /// Iterate over column names in declaration order
    ///
    /// ```
    /// use relation_joins::relation::identity::Identity;
    ///
    /// let identity = Identity::Binary("id".to_string(), "tenant_id".to_string());
    /// let columns: Vec<&str> = identity.iter().collect();
    /// assert_eq!(columns, vec!["id", "tenant_id"]);
    /// ```
    pub fn iter(&self) -> BorrowedIdentityIter<'_> {
        BorrowedIdentityIter {
            identity: self,
            index: 0,
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unary(col) => write!(f, "{}", col),
            _ => {
                let cols: Vec<&str> = self.iter().collect();
                write!(f, "({})", cols.join(", "))
            }
        }
    }
}

/// Iterator over borrowed column names in an `Identity`
#[derive(Debug)]
pub struct BorrowedIdentityIter<'a> {
    identity: &'a Identity,
    index: usize,
}

impl<'a> Iterator for BorrowedIdentityIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.identity {
            Identity::Unary(col1) => {
                if self.index == 0 {
                    Some(col1)
                } else {
                    None
                }
            }
            Identity::Binary(col1, col2) => match self.index {
                0 => Some(col1),
                1 => Some(col2),
                _ => None,
            },
            Identity::Ternary(col1, col2, col3) => match self.index {
                0 => Some(col1),
                1 => Some(col2),
                2 => Some(col3),
                _ => None,
            },
            Identity::Many(vec) => vec.get(self.index),
        };
        if result.is_some() {
            self.index += 1;
        }
        result.map(String::as_str)
    }
}

/// Trait for converting column names into an `Identity`
///
/// Implemented for single names and for slices/arrays/vectors of names, so the
/// declaration builders accept either `"post_id"` or `["post_id", "tenant_id"]`.
pub trait IntoIdentity {
    /// Convert this type into an `Identity`
    fn into_identity(self) -> Identity;
}

impl IntoIdentity for Identity {
    fn into_identity(self) -> Identity {
        self
    }
}

impl IntoIdentity for &str {
    fn into_identity(self) -> Identity {
        Identity::Unary(self.to_string())
    }
}

impl IntoIdentity for String {
    fn into_identity(self) -> Identity {
        Identity::Unary(self)
    }
}

impl IntoIdentity for Vec<String> {
    fn into_identity(self) -> Identity {
        Identity::from(IdentityRepr::List(self))
    }
}

impl IntoIdentity for &[&str] {
    fn into_identity(self) -> Identity {
        self.iter().map(|c| c.to_string()).collect::<Vec<_>>().into_identity()
    }
}

impl<const N: usize> IntoIdentity for [&str; N] {
    fn into_identity(self) -> Identity {
        self.as_slice().into_identity()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum IdentityRepr {
    Single(String),
    List(Vec<String>),
}

impl From<IdentityRepr> for Identity {
    fn from(repr: IdentityRepr) -> Self {
        match repr {
            IdentityRepr::Single(col) => Identity::Unary(col),
            IdentityRepr::List(mut cols) => match cols.len() {
                1 => Identity::Unary(cols.remove(0)),
                2 => {
                    let b = cols.remove(1);
                    Identity::Binary(cols.remove(0), b)
                }
                3 => {
                    let c = cols.remove(2);
                    let b = cols.remove(1);
                    Identity::Ternary(cols.remove(0), b, c)
                }
                _ => Identity::Many(cols),
            },
        }
    }
}

impl From<Identity> for IdentityRepr {
    fn from(identity: Identity) -> Self {
        match identity {
            Identity::Unary(col) => IdentityRepr::Single(col),
            other => IdentityRepr::List(other.iter().map(str::to_string).collect()),
        }
    }
}
