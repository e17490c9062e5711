use crate::{
    context::IndexContext,
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::identity::RecordId,
    obs::MetricsEvent,
    store::KvStore,
    value::Value,
};
use tracing::trace;

///
/// QueryResolver
///
/// Resolves an equality lookup on an ordered attribute tuple to record ids.
///
/// Attribute names must be given in the index's declaration order; a
/// permutation of a declared composite is an unknown index. There is no
/// scan fallback.
///

pub struct QueryResolver<'a, S: KvStore> {
    ctx: &'a IndexContext<S>,
}

impl<'a, S: KvStore> QueryResolver<'a, S> {
    pub(crate) const fn new(ctx: &'a IndexContext<S>) -> Self {
        Self { ctx }
    }

    /// Every record id whose indexed values equal `values`. Order is unspecified.
    pub fn resolve_all(
        &self,
        type_name: &str,
        attribute_names: &[&str],
        values: &[Value],
    ) -> Result<Vec<RecordId>, InternalError> {
        // Phase 1: shape and declaration checks.
        if attribute_names.is_empty() || attribute_names.len() != values.len() {
            return Err(InternalError::invalid_spec(
                ErrorOrigin::Resolver,
                format!(
                    "lookup arity mismatch on {type_name}: {} attributes, {} values",
                    attribute_names.len(),
                    values.len()
                ),
            ));
        }
        let descriptor = self.ctx.registry().lookup(type_name, attribute_names)?;

        // Phase 2: derive the entry key; a null value can never match.
        let values: Vec<&Value> = values.iter().collect();
        let Some(key) = self.ctx.keys().descriptor_key(descriptor, &values)? else {
            self.record(type_name, 0);
            return Ok(Vec::new());
        };

        // Phase 3: read the entry.
        let ids = self
            .ctx
            .store()
            .members(key.as_str())?
            .into_iter()
            .map(|member| {
                RecordId::try_new(member).map_err(|err| {
                    InternalError::new(
                        ErrorClass::Corruption,
                        ErrorOrigin::Resolver,
                        format!("index entry {key} holds an invalid record id: {err}"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!(type_name, index = %descriptor, %key, hits = ids.len(), "index resolved");
        self.record(type_name, ids.len());

        Ok(ids)
    }

    /// One matching record id, or `None` when nothing matches.
    ///
    /// With several matches the smallest id is returned.
    pub fn resolve_one(
        &self,
        type_name: &str,
        attribute_names: &[&str],
        values: &[Value],
    ) -> Result<Option<RecordId>, InternalError> {
        let ids = self.resolve_all(type_name, attribute_names, values)?;

        Ok(ids.into_iter().next())
    }

    fn record(&self, type_name: &str, hits: usize) {
        self.ctx.sink().record(MetricsEvent::Resolve {
            type_name,
            hits: hits as u64,
        });
    }
}
