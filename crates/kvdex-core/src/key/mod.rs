//! Module: key
//! Responsibility: deterministic storage-key derivation for index entries and records.
//! Does not own: normalization rules or store access.
//! Boundary: writer, resolver, and the model layer all address storage through here.
//!
//! Index key layout:
//!
//! ```text
//! {namespace}:{type}:idx:{cs|ci}:{attr}={len}.{value}[;{attr}={len}.{value}]...
//! ```
//!
//! Names never contain `:`, `=` or `;` (see `model::identity`), and every value
//! carries its byte length, so the layout is injective over
//! (type, attribute names, normalized values, mode).


use crate::{
    error::{ErrorOrigin, InternalError},
    model::{
        identity::{RecordId, validate_name},
        index::IndexDescriptor,
    },
    value::{AttributeSnapshot, NormalizedValue, TextMode, Value, normalize},
};
use derive_more::Display;

///
/// Constants
///

const INDEX_SEGMENT: &str = "idx";
const RECORD_SEGMENT: &str = "rec";
const IDS_SEGMENT: &str = "ids";

///
/// IndexKey
///
/// Fully-qualified storage key of one index entry.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IndexKey(String);

impl IndexKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for IndexKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

///
/// KeyBuilder
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyBuilder {
    namespace: String,
}

impl KeyBuilder {
    pub fn new(namespace: impl Into<String>) -> Result<Self, InternalError> {
        let namespace = namespace.into();
        validate_name(&namespace).map_err(|err| {
            InternalError::invalid_spec(ErrorOrigin::Key, format!("namespace invalid: {err}"))
        })?;

        Ok(Self { namespace })
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Build the entry key for already-normalized values.
    ///
    /// `attribute_names` and `values` must be aligned and non-empty.
    pub fn build_key(
        &self,
        type_name: &str,
        attribute_names: &[&str],
        values: &[NormalizedValue],
        case_insensitive: bool,
    ) -> Result<IndexKey, InternalError> {
        // Phase 1: arity and name validation.
        if attribute_names.is_empty() || attribute_names.len() != values.len() {
            return Err(InternalError::invalid_spec(
                ErrorOrigin::Key,
                format!(
                    "index key arity mismatch on {type_name}: {} attributes, {} values",
                    attribute_names.len(),
                    values.len()
                ),
            ));
        }

        let mut key = self.type_prefix(type_name)?;
        for name in attribute_names {
            Self::check_name(name)?;
        }

        // Phase 2: append mode and length-prefixed components in declaration order.
        let mode = match TextMode::from_case_insensitive(case_insensitive) {
            TextMode::Cs => "cs",
            TextMode::Ci => "ci",
        };
        key.push_str(INDEX_SEGMENT);
        key.push(':');
        key.push_str(mode);
        key.push(':');

        for (i, (name, value)) in attribute_names.iter().zip(values).enumerate() {
            if i > 0 {
                key.push(';');
            }
            let value = value.as_str();
            key.push_str(name);
            key.push('=');
            key.push_str(&value.len().to_string());
            key.push('.');
            key.push_str(value);
        }

        Ok(IndexKey(key))
    }

    /// Normalize `values` per `descriptor` and build its entry key.
    ///
    /// Returns `Ok(None)` when any value is null: nothing is indexed for it.
    pub fn descriptor_key(
        &self,
        descriptor: &IndexDescriptor,
        values: &[&Value],
    ) -> Result<Option<IndexKey>, InternalError> {
        let case_insensitive = descriptor.case_insensitive();

        let Some(normalized) = values
            .iter()
            .map(|value| normalize(value, case_insensitive))
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(None);
        };

        self.build_key(
            descriptor.owner_type(),
            &descriptor.attribute_refs(),
            &normalized,
            case_insensitive,
        )
        .map(Some)
    }

    /// Entry key a snapshot maps to under `descriptor`, if it is indexable.
    pub fn snapshot_key(
        &self,
        descriptor: &IndexDescriptor,
        snapshot: &AttributeSnapshot,
    ) -> Result<Option<IndexKey>, InternalError> {
        match snapshot.values_for(descriptor) {
            Some(values) => self.descriptor_key(descriptor, &values),
            None => Ok(None),
        }
    }

    /// Key holding one record's stored attributes.
    pub fn record_key(&self, type_name: &str, id: &RecordId) -> Result<String, InternalError> {
        let mut key = self.type_prefix(type_name)?;
        key.push_str(RECORD_SEGMENT);
        key.push(':');
        key.push_str(id.as_str());

        Ok(key)
    }

    /// Key of the set holding every record identifier of a type.
    pub fn ids_key(&self, type_name: &str) -> Result<String, InternalError> {
        let mut key = self.type_prefix(type_name)?;
        key.push_str(IDS_SEGMENT);

        Ok(key)
    }

    /// Common prefix of every index entry key of a type.
    pub fn index_prefix(&self, type_name: &str) -> Result<String, InternalError> {
        let mut key = self.type_prefix(type_name)?;
        key.push_str(INDEX_SEGMENT);
        key.push(':');

        Ok(key)
    }

    fn type_prefix(&self, type_name: &str) -> Result<String, InternalError> {
        Self::check_name(type_name)?;

        Ok(format!("{}:{type_name}:", self.namespace))
    }

    fn check_name(name: &str) -> Result<(), InternalError> {
        validate_name(name).map_err(|err| {
            InternalError::invalid_spec(ErrorOrigin::Key, format!("key segment invalid: {err}"))
        })
    }
}
