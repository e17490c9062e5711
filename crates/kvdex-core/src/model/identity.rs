//! Module: model::identity
//! Responsibility: validated type/attribute names and record identifiers.
//! Does not own: key layout.
//! Boundary: every name that reaches a storage key is validated here.
//!
//! Invariants:
//! - Names are non-empty, ASCII, and bounded by MAX_NAME_LEN.
//! - Names contain only `[A-Za-z0-9_-]`, so they never carry key delimiters.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// Constants
///

pub const MAX_NAME_LEN: usize = 64;

///
/// NameError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("name '{name}' length {len} exceeds max {max}")]
    TooLong { name: String, len: usize, max: usize },

    #[error("name '{name}' contains invalid character {ch:?}")]
    InvalidChar { name: String, ch: char },
}

/// Validate one type or attribute name.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong {
            name: name.to_string(),
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    if let Some(ch) = name
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-'))
    {
        return Err(NameError::InvalidChar {
            name: name.to_string(),
            ch,
        });
    }

    Ok(())
}

///
/// RecordId
///
/// Opaque, globally unique record identifier.
/// Assigned once at creation and stable for the record's lifetime.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh time-ordered identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Wrap an externally assigned identifier. Identifiers follow the name rules.
    pub fn try_new(id: impl Into<String>) -> Result<Self, NameError> {
        let id = id.into();
        validate_name(&id)?;

        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
