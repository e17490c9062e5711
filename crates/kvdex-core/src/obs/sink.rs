//! Metrics sink boundary.

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    ApplyStart {
        type_name: &'a str,
    },
    IndexDelta {
        type_name: &'a str,
        inserts: u64,
        removes: u64,
        unchanged: u64,
    },
    IndexFailure {
        type_name: &'a str,
        families: u64,
    },
    Resolve {
        type_name: &'a str,
        hits: u64,
    },
}

impl MetricsEvent<'_> {
    #[must_use]
    pub const fn type_name(&self) -> &str {
        match self {
            Self::ApplyStart { type_name }
            | Self::IndexDelta { type_name, .. }
            | Self::IndexFailure { type_name, .. }
            | Self::Resolve { type_name, .. } => type_name,
        }
    }
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// NoopSink
/// Default sink; drops every event.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _: MetricsEvent<'_>) {}
}
