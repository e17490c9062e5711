//! Index declarations per record type.

use crate::error::Error;
use kvdex_core::{MAX_INDEX_FIELDS, config::IndexConfig, registry::IndexRegistry};

///
/// Schema
///
/// Validated index declarations, built once at startup.
///

#[derive(Clone, Debug, Default)]
pub struct Schema {
    registry: IndexRegistry,
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Builder whose attribute limit follows `config`.
    #[must_use]
    pub fn builder_for(config: &IndexConfig) -> SchemaBuilder {
        SchemaBuilder::default().max_index_fields(config.max_index_fields)
    }

    #[must_use]
    pub const fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    #[must_use]
    pub fn into_registry(self) -> IndexRegistry {
        self.registry
    }
}

///
/// SchemaBuilder
///

#[derive(Debug)]
pub struct SchemaBuilder {
    max_index_fields: usize,
    models: Vec<ModelBuilder>,
}

impl SchemaBuilder {
    /// Lower the per-index attribute limit below [`MAX_INDEX_FIELDS`].
    #[must_use]
    pub const fn max_index_fields(mut self, max: usize) -> Self {
        self.max_index_fields = max;
        self
    }

    /// Declare the indices of one record type.
    #[must_use]
    pub fn model(
        mut self,
        type_name: &str,
        declare: impl FnOnce(ModelBuilder) -> ModelBuilder,
    ) -> Self {
        self.models.push(declare(ModelBuilder::new(type_name)));
        self
    }

    /// Register every declaration, stopping at the first invalid one.
    pub fn build(self) -> Result<Schema, Error> {
        let mut registry = IndexRegistry::with_max_fields(self.max_index_fields);

        for model in &self.models {
            for (attributes, case_insensitive) in &model.indexes {
                let attributes: Vec<&str> = attributes.iter().map(String::as_str).collect();
                registry.register(&model.type_name, &attributes, *case_insensitive)?;
            }
        }

        Ok(Schema { registry })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self {
            max_index_fields: MAX_INDEX_FIELDS,
            models: Vec::new(),
        }
    }
}

///
/// ModelBuilder
/// Index declarations for one record type, in declaration order.
///

#[derive(Debug)]
pub struct ModelBuilder {
    type_name: String,
    indexes: Vec<(Vec<String>, bool)>,
}

impl ModelBuilder {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            indexes: Vec::new(),
        }
    }

    /// Case-sensitive index over `attributes`, in that order.
    #[must_use]
    pub fn index(self, attributes: &[&str]) -> Self {
        self.declare(attributes, false)
    }

    /// Case-insensitive index over `attributes`, in that order.
    #[must_use]
    pub fn index_ci(self, attributes: &[&str]) -> Self {
        self.declare(attributes, true)
    }

    fn declare(mut self, attributes: &[&str], case_insensitive: bool) -> Self {
        self.indexes.push((
            attributes.iter().map(ToString::to_string).collect(),
            case_insensitive,
        ));
        self
    }
}

///
/// TESTS
///
