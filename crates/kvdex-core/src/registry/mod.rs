//! Module: registry
//! Responsibility: declared index descriptors per record type.
//! Does not own: storage, key layout, or query execution.
//! Boundary: built once at startup, then shared read-only with writer/resolver.


use crate::{
    MAX_INDEX_FIELDS,
    error::{ErrorOrigin, InternalError},
    model::{identity::validate_name, index::IndexDescriptor},
};
use std::collections::BTreeMap;

///
/// IndexRegistry
///
/// Injectable table of declared indices, keyed by owner type.
/// Declaration order is preserved per type.
///

#[derive(Clone, Debug)]
pub struct IndexRegistry {
    max_index_fields: usize,
    types: BTreeMap<String, Vec<IndexDescriptor>>,
}

impl IndexRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_fields(MAX_INDEX_FIELDS)
    }

    #[must_use]
    pub fn with_max_fields(max_index_fields: usize) -> Self {
        Self {
            max_index_fields: max_index_fields.clamp(1, MAX_INDEX_FIELDS),
            types: BTreeMap::new(),
        }
    }

    /// Declare an index on `type_name` over `attribute_names`, in that order.
    pub fn register(
        &mut self,
        type_name: &str,
        attribute_names: &[&str],
        case_insensitive: bool,
    ) -> Result<&IndexDescriptor, InternalError> {
        // Phase 1: validate declaration shape.
        validate_name(type_name).map_err(|err| {
            InternalError::invalid_spec(ErrorOrigin::Registry, format!("type name invalid: {err}"))
        })?;

        if attribute_names.is_empty() {
            return Err(InternalError::invalid_spec(
                ErrorOrigin::Registry,
                format!("index on {type_name} declares no attributes"),
            ));
        }
        if attribute_names.len() > self.max_index_fields {
            return Err(InternalError::invalid_spec(
                ErrorOrigin::Registry,
                format!(
                    "index on {type_name}({}) has {} attributes (max {})",
                    attribute_names.join(", "),
                    attribute_names.len(),
                    self.max_index_fields
                ),
            ));
        }

        for (i, name) in attribute_names.iter().enumerate() {
            validate_name(name).map_err(|err| {
                InternalError::invalid_spec(
                    ErrorOrigin::Registry,
                    format!("index on {type_name}: attribute name invalid: {err}"),
                )
            })?;

            if attribute_names[..i].contains(name) {
                return Err(InternalError::invalid_spec(
                    ErrorOrigin::Registry,
                    format!("index on {type_name} repeats attribute '{name}'"),
                ));
            }
        }

        // Phase 2: reject a second declaration of the same attribute tuple.
        let declared = self.types.entry(type_name.to_string()).or_default();
        if let Some(existing) = declared.iter().find(|d| d.matches(attribute_names)) {
            return Err(InternalError::invalid_spec(
                ErrorOrigin::Registry,
                format!("index already declared: {existing}"),
            ));
        }

        declared.push(IndexDescriptor::new(
            type_name,
            attribute_names,
            case_insensitive,
        ));

        Ok(&declared[declared.len() - 1])
    }

    /// Find the index declared on exactly `attribute_names`, in declaration order.
    pub fn lookup(
        &self,
        type_name: &str,
        attribute_names: &[&str],
    ) -> Result<&IndexDescriptor, InternalError> {
        self.all_for(type_name)
            .iter()
            .find(|descriptor| descriptor.matches(attribute_names))
            .ok_or_else(|| InternalError::unknown_index(type_name, attribute_names))
    }

    /// All indices declared on `type_name`; empty for undeclared types.
    #[must_use]
    pub fn all_for(&self, type_name: &str) -> &[IndexDescriptor] {
        self.types
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new()
    }
}
