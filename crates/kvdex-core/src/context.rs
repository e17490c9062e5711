//! Module: context
//! Responsibility: bundle the registry, store, key builder, and sink one engine runs against.
//! Does not own: index semantics or record encoding.
//! Boundary: the only place writers and resolvers are constructed.

use crate::{
    config::IndexConfig,
    error::InternalError,
    index::{IndexWriter, QueryResolver},
    key::KeyBuilder,
    obs::{MetricsSink, NoopSink},
    registry::IndexRegistry,
    store::KvStore,
};
use std::sync::Arc;

///
/// IndexContext
///
/// Shared, read-only engine state. Cheap to borrow from many threads;
/// all mutation goes through the store.
///

pub struct IndexContext<S: KvStore> {
    registry: Arc<IndexRegistry>,
    store: S,
    keys: KeyBuilder,
    sink: Arc<dyn MetricsSink>,
}

impl<S: KvStore> IndexContext<S> {
    /// Validate `config` and build a context over `store`.
    pub fn new(
        registry: impl Into<Arc<IndexRegistry>>,
        store: S,
        config: IndexConfig,
    ) -> Result<Self, InternalError> {
        config.validate()?;
        let keys = KeyBuilder::new(config.namespace)?;

        Ok(Self {
            registry: registry.into(),
            store,
            keys,
            sink: Arc::new(NoopSink),
        })
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn writer(&self) -> IndexWriter<'_, S> {
        IndexWriter::new(self)
    }

    #[must_use]
    pub const fn resolver(&self) -> QueryResolver<'_, S> {
        QueryResolver::new(self)
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    #[must_use]
    pub fn sink(&self) -> &dyn MetricsSink {
        self.sink.as_ref()
    }
}
