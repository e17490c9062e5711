use crate::{
    context::IndexContext,
    error::{IndexFamilyFailure, IndexStep, IndexUpdateFailure, InternalError},
    index::plan::{IndexDelta, plan_index_deltas},
    model::identity::RecordId,
    obs::MetricsEvent,
    store::{KvStore, StoreError},
    value::AttributeSnapshot,
};
use serde::Serialize;
use tracing::{debug, warn};

///
/// ApplyReport
///
/// Store operations issued by one successful `apply`.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ApplyReport {
    pub inserts: usize,
    pub removes: usize,
    pub unchanged: usize,
}

impl ApplyReport {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.inserts == 0 && self.removes == 0
    }
}

///
/// IndexWriter
///
/// Applies index membership changes for one record transition.
///
/// Every declared index of the type is processed even when an earlier family
/// fails; failures are reported together. Re-running `apply` with the same
/// arguments is safe because membership add/remove are idempotent.
///

pub struct IndexWriter<'a, S: KvStore> {
    ctx: &'a IndexContext<S>,
}

impl<'a, S: KvStore> IndexWriter<'a, S> {
    pub(crate) const fn new(ctx: &'a IndexContext<S>) -> Self {
        Self { ctx }
    }

    /// Bring every index of `type_name` in line with `new`.
    ///
    /// `old == None` is a creation, `new == None` a deletion, both present an
    /// update. Families whose entry key did not change are not written.
    pub fn apply(
        &self,
        type_name: &str,
        id: &RecordId,
        old: Option<&AttributeSnapshot>,
        new: Option<&AttributeSnapshot>,
    ) -> Result<ApplyReport, InternalError> {
        let sink = self.ctx.sink();
        sink.record(MetricsEvent::ApplyStart { type_name });

        // Phase 1: derive every key up front. Nothing is written if this fails.
        let descriptors = self.ctx.registry().all_for(type_name);
        let plan = plan_index_deltas(self.ctx.keys(), descriptors, old, new)?;

        // Phase 2: apply each family, collecting failures instead of stopping.
        let mut report = ApplyReport {
            unchanged: plan.unchanged,
            ..ApplyReport::default()
        };
        let mut families = Vec::new();

        for delta in &plan.deltas {
            self.apply_delta(id, delta, &mut report, &mut families);
        }

        sink.record(MetricsEvent::IndexDelta {
            type_name,
            inserts: report.inserts as u64,
            removes: report.removes as u64,
            unchanged: report.unchanged as u64,
        });

        // Phase 3: surface the aggregate failure, if any.
        if !families.is_empty() {
            sink.record(MetricsEvent::IndexFailure {
                type_name,
                families: families.len() as u64,
            });

            let failure = IndexUpdateFailure {
                type_name: type_name.to_string(),
                record_id: id.to_string(),
                attempted: plan.deltas.iter().map(IndexDelta::op_count).sum(),
                families,
            };
            warn!(
                type_name,
                record_id = %id,
                failed = failure.families.len(),
                attempted = failure.attempted,
                "index update partially failed"
            );

            return Err(InternalError::index_update(failure));
        }

        debug!(
            type_name,
            record_id = %id,
            inserts = report.inserts,
            removes = report.removes,
            unchanged = report.unchanged,
            "index apply complete"
        );

        Ok(report)
    }

    fn apply_delta(
        &self,
        id: &RecordId,
        delta: &IndexDelta<'_>,
        report: &mut ApplyReport,
        families: &mut Vec<IndexFamilyFailure>,
    ) {
        let store = self.ctx.store();
        let member = id.as_str();

        // Remove before add.
        if let Some(key) = &delta.remove {
            match store.remove_member(key.as_str(), member) {
                Ok(_) => report.removes += 1,
                Err(source) => families.push(family_failure(delta, IndexStep::Remove, key, source)),
            }
        }

        if let Some(key) = &delta.add {
            match store.add_member(key.as_str(), member) {
                Ok(_) => report.inserts += 1,
                Err(source) => families.push(family_failure(delta, IndexStep::Add, key, source)),
            }
        }
    }
}

fn family_failure(
    delta: &IndexDelta<'_>,
    step: IndexStep,
    key: &impl ToString,
    source: StoreError,
) -> IndexFamilyFailure {
    IndexFamilyFailure {
        index: delta.descriptor.to_string(),
        step,
        key: key.to_string(),
        source,
    }
}
