//! Observability: runtime counters and sink abstractions.
//!
//! Engine code never touches counters directly; every event flows through a
//! [`MetricsSink`]. Diagnostic logging goes through `tracing` alongside.

mod metrics;
mod sink;

pub use metrics::{EventCounters, EventReport, TypeCounters};
pub use sink::{MetricsEvent, MetricsSink, NoopSink};
