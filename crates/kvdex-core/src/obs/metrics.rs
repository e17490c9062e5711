use crate::obs::sink::{MetricsEvent, MetricsSink};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// EventReport
/// Point-in-time copy of all counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub totals: TypeCounters,
    pub types: BTreeMap<String, TypeCounters>,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TypeCounters {
    pub apply_calls: u64,
    pub index_inserts: u64,
    pub index_removes: u64,
    pub index_unchanged: u64,
    pub index_failures: u64,
    pub resolve_calls: u64,
    pub resolve_hits: u64,
}

impl TypeCounters {
    fn apply(&mut self, event: &MetricsEvent<'_>) {
        match *event {
            MetricsEvent::ApplyStart { .. } => {
                self.apply_calls = self.apply_calls.saturating_add(1);
            }
            MetricsEvent::IndexDelta {
                inserts,
                removes,
                unchanged,
                ..
            } => {
                self.index_inserts = self.index_inserts.saturating_add(inserts);
                self.index_removes = self.index_removes.saturating_add(removes);
                self.index_unchanged = self.index_unchanged.saturating_add(unchanged);
            }
            MetricsEvent::IndexFailure { families, .. } => {
                self.index_failures = self.index_failures.saturating_add(families);
            }
            MetricsEvent::Resolve { hits, .. } => {
                self.resolve_calls = self.resolve_calls.saturating_add(1);
                self.resolve_hits = self.resolve_hits.saturating_add(hits);
            }
        }
    }
}

///
/// EventCounters
///
/// In-memory sink that aggregates events globally and per record type.
///

#[derive(Debug, Default)]
pub struct EventCounters {
    state: Mutex<EventReport>,
}

impl EventCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> EventReport {
        self.state.lock().clone()
    }

    pub fn reset(&self) {
        *self.state.lock() = EventReport::default();
    }
}

impl MetricsSink for EventCounters {
    fn record(&self, event: MetricsEvent<'_>) {
        let mut state = self.state.lock();

        state.totals.apply(&event);
        state
            .types
            .entry(event.type_name().to_string())
            .or_default()
            .apply(&event);
    }
}

///
/// TESTS
///
