//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::{MAX_INDEX_FIELDS, error::InternalError, model::identity::validate_name};
use serde::{Deserialize, Serialize};

///
/// IndexConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Prefix of every key the engine writes.
    pub namespace: String,

    /// Upper bound on attributes per composite index.
    pub max_index_fields: usize,
}

impl IndexConfig {
    pub const DEFAULT_NAMESPACE: &'static str = "kvdex";

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, InternalError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| InternalError::config_invalid(format!("config parse failed: {err}")))?;
        config.validate()?;

        Ok(config)
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn validate(&self) -> Result<(), InternalError> {
        validate_name(&self.namespace).map_err(|err| {
            InternalError::config_invalid(format!("config namespace invalid: {err}"))
        })?;

        if self.max_index_fields == 0 || self.max_index_fields > MAX_INDEX_FIELDS {
            return Err(InternalError::config_invalid(format!(
                "config max_index_fields must be in 1..={MAX_INDEX_FIELDS}, got {}",
                self.max_index_fields
            )));
        }

        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            max_index_fields: MAX_INDEX_FIELDS,
        }
    }
}

///
/// TESTS
///
