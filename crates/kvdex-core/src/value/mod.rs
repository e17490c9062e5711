//! Module: value
//! Responsibility: attribute values, snapshots, and index normalization.
//! Does not own: key layout or attribute validation.
//! Boundary: writer and resolver both normalize through [`normalize`].

mod normalize;
mod snapshot;


pub use normalize::{NormalizedValue, TextMode, fold_case, normalize};
pub use snapshot::AttributeSnapshot;

use derive_more::From;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// Attribute value as seen by the index engine.
/// `Null` is never indexed.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, From, Hash, PartialEq, Serialize)]
pub enum Value {
    #[default]
    #[from(ignore)]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Self::Uint(u64::from(u))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
