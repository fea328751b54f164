//! Telemetry sink abstraction and the metric names the client emits.

use log::debug;
use std::sync::{Arc, Mutex};

/// Counter incremented when a request fails below the HTTP layer.
pub const REQUEST_EXCEPTION_METRIC: &str = "error.zoom_request_exception";

/// Timing metric for a completed request: `zoom.http.latency.<prefix>.<status>`.
pub fn latency_metric_name(path_prefix: &str, status: u16) -> String {
    format!("zoom.http.latency.{}.{}", path_prefix, status)
}

/// Counter for a completed request: `zoom.http.code.<prefix>.<status>`.
pub fn code_metric_name(path_prefix: &str, status: u16) -> String {
    format!("zoom.http.code.{}.{}", path_prefix, status)
}

/// Receiver for named counters and timers. Calls are fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait MetricsSink: Send + Sync {
    fn timing(&self, name: &str, millis: u64);
    fn increment(&self, name: &str, amount: u64);
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn timing(&self, name: &str, millis: u64) {
        (**self).timing(name, millis)
    }

    fn increment(&self, name: &str, amount: u64) {
        (**self).increment(name, amount)
    }
}

impl<T: MetricsSink + ?Sized> MetricsSink for Box<T> {
    fn timing(&self, name: &str, millis: u64) {
        (**self).timing(name, millis)
    }

    fn increment(&self, name: &str, amount: u64) {
        (**self).increment(name, amount)
    }
}

/// Discards every metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn timing(&self, _name: &str, _millis: u64) {}
    fn increment(&self, _name: &str, _amount: u64) {}
}

/// Writes every metric to the log at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMetrics;

impl MetricsSink for LogMetrics {
    fn timing(&self, name: &str, millis: u64) {
        debug!("metric timing {} = {}ms", name, millis);
    }

    fn increment(&self, name: &str, amount: u64) {
        debug!("metric increment {} += {}", name, amount);
    }
}

/// A single recorded metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricEvent {
    Timing { name: String, millis: u64 },
    Increment { name: String, amount: u64 },
}

impl MetricEvent {
    pub fn name(&self) -> &str {
        match self {
            MetricEvent::Timing { name, .. } | MetricEvent::Increment { name, .. } => name,
        }
    }
}

/// Keeps every metric in memory, in arrival order.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    events: Mutex<Vec<MetricEvent>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<MetricEvent> {
        self.lock().clone()
    }

    pub fn timings(&self) -> Vec<(String, u64)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                MetricEvent::Timing { name, millis } => Some((name.clone(), *millis)),
                _ => None,
            })
            .collect()
    }

    pub fn counters(&self) -> Vec<(String, u64)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                MetricEvent::Increment { name, amount } => Some((name.clone(), *amount)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MetricEvent>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, event: MetricEvent) {
        self.lock().push(event);
    }
}

impl MetricsSink for InMemoryMetrics {
    fn timing(&self, name: &str, millis: u64) {
        self.push(MetricEvent::Timing {
            name: name.to_string(),
            millis,
        });
    }

    fn increment(&self, name: &str, amount: u64) {
        self.push(MetricEvent::Increment {
            name: name.to_string(),
            amount,
        });
    }
}
