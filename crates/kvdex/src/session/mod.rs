//! Module: session
//! Responsibility: model-layer persistence and attribute lookups over one store.
//! Does not own: index maintenance rules or key layout.
//! Boundary: hands the core writer old/new snapshots on every persist and
//! routes every `find_by` through the core resolver.

#[cfg(test)]
mod tests;

use crate::{
    error::{Error, ErrorKind, ErrorOrigin, StoreErrorKind},
    record::Record,
    schema::Schema,
};
use kvdex_core::{
    config::IndexConfig,
    context::IndexContext,
    model::identity::RecordId,
    obs::MetricsSink,
    store::KvStore,
    value::{AttributeSnapshot, Value},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

///
/// ReindexReport
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ReindexReport {
    pub records: usize,
    pub index_writes: usize,
    pub pruned: usize,
}

///
/// Session
///
/// Public facade over one store and one schema.
/// Converts core errors into `kvdex::Error`.
///
/// Writes to the same record must be serialized by the caller; concurrent
/// readers may briefly see a record under both its old and new entries.
///

pub struct Session<S: KvStore> {
    ctx: IndexContext<S>,
}

impl<S: KvStore> Session<S> {
    pub fn new(schema: Schema, store: S, config: IndexConfig) -> Result<Self, Error> {
        let ctx = IndexContext::new(schema.into_registry(), store, config)?;

        Ok(Self { ctx })
    }

    /// Override the metrics sink for operations executed through this session.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.ctx = self.ctx.with_sink(sink);
        self
    }

    #[must_use]
    pub const fn context(&self) -> &IndexContext<S> {
        &self.ctx
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        self.ctx.store()
    }

    //
    // Writes
    //

    /// Persist a new record under a fresh identifier.
    ///
    /// A failed create is undone before returning. If the cleanup also fails,
    /// the error carries the identifier and the record stays reachable
    /// through `ids`, `delete` and `reindex`.
    pub fn create(&self, type_name: &str, record: Record) -> Result<RecordId, Error> {
        let id = RecordId::generate();
        self.insert(type_name, &id, &record)?;
        debug!(type_name, record_id = %id, "record created");

        Ok(id)
    }

    /// Insert or replace the record stored under `id`.
    pub fn save(&self, type_name: &str, id: &RecordId, record: Record) -> Result<(), Error> {
        match self.get(type_name, id)? {
            Some(previous) => self.replace(type_name, id, &previous, &record),
            None => self.insert(type_name, id, &record),
        }
    }

    /// Merge `changes` into an existing record and save it.
    pub fn update_attributes(
        &self,
        type_name: &str,
        id: &RecordId,
        changes: Record,
    ) -> Result<Record, Error> {
        let previous = self
            .get(type_name, id)?
            .ok_or_else(|| Error::not_found(type_name, id))?;

        let mut record = previous.clone();
        record.merge(changes);
        self.replace(type_name, id, &previous, &record)?;

        Ok(record)
    }

    /// Remove a record and every index entry that references it.
    ///
    /// The body goes last, so a failed delete can be retried until it succeeds.
    pub fn delete(&self, type_name: &str, id: &RecordId) -> Result<(), Error> {
        let previous = self
            .get(type_name, id)?
            .ok_or_else(|| Error::not_found(type_name, id))?;
        let descriptors = self.ctx.registry().all_for(type_name);

        // Phase 1: indices first; the record stays readable until they are gone.
        self.ctx
            .writer()
            .apply(type_name, id, Some(&previous.snapshot(descriptors)), None)?;

        // Phase 2: identifier membership, then record body.
        self.remove_record(type_name, id)?;
        debug!(type_name, record_id = %id, "record deleted");

        Ok(())
    }

    /// Re-add every stored record of `type_name` to its index entries.
    ///
    /// Restores entries lost to an earlier failed write and drops identifiers
    /// whose record body is gone. Entries pointing at values a record no longer
    /// holds are not discovered here. Run it while no create of the type is in
    /// flight.
    pub fn reindex(&self, type_name: &str) -> Result<ReindexReport, Error> {
        let descriptors = self.ctx.registry().all_for(type_name);
        let ids_key = self.ctx.keys().ids_key(type_name)?;
        let mut report = ReindexReport::default();

        for id in self.ids(type_name)? {
            let Some(record) = self.get(type_name, &id)? else {
                self.store().remove_member(&ids_key, id.as_str())?;
                report.pruned += 1;
                continue;
            };

            let applied = self.ctx.writer().apply(
                type_name,
                &id,
                None,
                Some(&record.snapshot(descriptors)),
            )?;
            report.records += 1;
            report.index_writes += applied.inserts;
        }
        debug!(
            type_name,
            records = report.records,
            index_writes = report.index_writes,
            pruned = report.pruned,
            "reindex complete"
        );

        Ok(report)
    }

    //
    // Reads
    //

    pub fn get(&self, type_name: &str, id: &RecordId) -> Result<Option<Record>, Error> {
        let key = self.ctx.keys().record_key(type_name, id)?;

        match self.store().get(&key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Every stored identifier of `type_name`, in ascending order.
    pub fn ids(&self, type_name: &str) -> Result<Vec<RecordId>, Error> {
        let key = self.ctx.keys().ids_key(type_name)?;

        self.store()
            .members(&key)?
            .into_iter()
            .map(|member| {
                RecordId::try_new(member).map_err(|err| {
                    Error::new(
                        ErrorKind::Store(StoreErrorKind::Corrupt),
                        ErrorOrigin::Record,
                        format!("identifier set {key} holds an invalid id: {err}"),
                    )
                })
            })
            .collect()
    }

    pub fn count(&self, type_name: &str) -> Result<usize, Error> {
        let key = self.ctx.keys().ids_key(type_name)?;

        Ok(self.store().members(&key)?.len())
    }

    /// One record whose indexed `attributes` equal `values`, if any.
    pub fn find_by(
        &self,
        type_name: &str,
        attributes: &[&str],
        values: &[Value],
    ) -> Result<Option<(RecordId, Record)>, Error> {
        let ids = self
            .ctx
            .resolver()
            .resolve_all(type_name, attributes, values)?;

        for id in ids {
            if let Some(record) = self.hydrate(type_name, &id)? {
                return Ok(Some((id, record)));
            }
        }

        Ok(None)
    }

    /// Every record whose indexed `attributes` equal `values`.
    pub fn find_all_by(
        &self,
        type_name: &str,
        attributes: &[&str],
        values: &[Value],
    ) -> Result<Vec<(RecordId, Record)>, Error> {
        let ids = self
            .ctx
            .resolver()
            .resolve_all(type_name, attributes, values)?;

        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.hydrate(type_name, &id)? {
                found.push((id, record));
            }
        }

        Ok(found)
    }

    //
    // Internals
    //

    // Store a record under an identifier with no stored body.
    fn insert(&self, type_name: &str, id: &RecordId, record: &Record) -> Result<(), Error> {
        let descriptors = self.ctx.registry().all_for(type_name);
        let ids_key = self.ctx.keys().ids_key(type_name)?;
        let record_key = self.ctx.keys().record_key(type_name, id)?;
        let snapshot = record.snapshot(descriptors);
        let json = encode(record)?;

        // Phase 1: identifier membership, so every later write stays reachable.
        self.store().add_member(&ids_key, id.as_str())?;

        // Phase 2: record body, then indices.
        let written = self
            .store()
            .set(&record_key, &json)
            .map_err(Error::from)
            .and_then(|()| {
                self.ctx
                    .writer()
                    .apply(type_name, id, None, Some(&snapshot))
                    .map(|_| ())
                    .map_err(Error::from)
            });

        // Phase 3: undo whatever part of the insert landed.
        if let Err(err) = written {
            if let Err(cleanup) = self.discard(type_name, id, &snapshot) {
                warn!(
                    type_name,
                    record_id = %id,
                    error = %cleanup,
                    "failed insert left in place"
                );
            }

            return Err(err.with_record_id(id));
        }

        Ok(())
    }

    // Replace a stored record, moving its index entries from `previous` to `record`.
    fn replace(
        &self,
        type_name: &str,
        id: &RecordId,
        previous: &Record,
        record: &Record,
    ) -> Result<(), Error> {
        let descriptors = self.ctx.registry().all_for(type_name);
        let ids_key = self.ctx.keys().ids_key(type_name)?;
        let record_key = self.ctx.keys().record_key(type_name, id)?;
        let old = previous.snapshot(descriptors);
        let new = record.snapshot(descriptors);
        let json = encode(record)?;

        // Phase 1: indices first; a failed apply leaves the stored record unchanged.
        self.ctx
            .writer()
            .apply(type_name, id, Some(&old), Some(&new))?;

        // Phase 2: record body. On failure, point the indices back at the stored body.
        if let Err(err) = self.store().set(&record_key, &json) {
            let reverted = self
                .ctx
                .writer()
                .apply(type_name, id, Some(&new), Some(&old));
            if let Err(revert) = reverted {
                warn!(
                    type_name,
                    record_id = %id,
                    error = %revert,
                    "index revert failed; entries follow the unsaved record"
                );
            }

            return Err(Error::from(err).with_record_id(id));
        }

        // Phase 3: identifier membership; body and indices already agree.
        self.store()
            .add_member(&ids_key, id.as_str())
            .map_err(|err| Error::from(err).with_record_id(id))?;

        Ok(())
    }

    // Drop the index entries, membership and body of a failed insert.
    fn discard(
        &self,
        type_name: &str,
        id: &RecordId,
        snapshot: &AttributeSnapshot,
    ) -> Result<(), Error> {
        self.ctx
            .writer()
            .apply(type_name, id, Some(snapshot), None)?;

        self.remove_record(type_name, id)
    }

    fn remove_record(&self, type_name: &str, id: &RecordId) -> Result<(), Error> {
        let keys = self.ctx.keys();

        self.store()
            .remove_member(&keys.ids_key(type_name)?, id.as_str())?;
        self.store().delete(&keys.record_key(type_name, id)?)?;

        Ok(())
    }

    // An index hit whose record is gone is a concurrent delete in flight.
    fn hydrate(&self, type_name: &str, id: &RecordId) -> Result<Option<Record>, Error> {
        let record = self.get(type_name, id)?;
        if record.is_none() {
            trace!(type_name, record_id = %id, "index hit without record");
        }

        Ok(record)
    }
}

fn encode(record: &Record) -> Result<String, Error> {
    serde_json::to_string(record).map_err(|err| {
        Error::new(
            ErrorKind::Internal,
            ErrorOrigin::Record,
            format!("record encode failed: {err}"),
        )
    })
}
