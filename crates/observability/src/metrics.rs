//! Latency profiling.
//!
//! The relay reports one sample per listener invocation, labelled
//! `event:<kind>`. Profilers are fire-and-forget: they never report errors
//! back to the caller.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Sink for `(label, duration)` latency samples.
pub trait Profiler: Send + Sync {
    /// Record one sample. Must not block for long and must not fail.
    fn add_data_point(&self, label: &str, duration_ms: f64);
}

impl<P> Profiler for Arc<P>
where
    P: Profiler + ?Sized,
{
    fn add_data_point(&self, label: &str, duration_ms: f64) {
        (**self).add_data_point(label, duration_ms)
    }
}

/// Discards every sample.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopProfiler;

impl Profiler for NoopProfiler {
    fn add_data_point(&self, _label: &str, _duration_ms: f64) {}
}

/// Aggregated samples for one label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataPoint {
    pub count: u64,
    pub total_ms: f64,
    pub max_ms: f64,
    pub average_ms: f64,
}

impl DataPoint {
    fn record(&mut self, duration_ms: f64) {
        self.count += 1;
        self.total_ms += duration_ms;
        if duration_ms > self.max_ms {
            self.max_ms = duration_ms;
        }
        self.average_ms = self.total_ms / self.count as f64;
    }
}

/// In-memory profiler aggregating samples per label.
///
/// Negative or non-finite durations are clamped to zero.
#[derive(Debug, Default)]
pub struct LatencyProfiler {
    points: Mutex<HashMap<String, DataPoint>>,
}

impl LatencyProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate for a single label, if any sample was recorded.
    pub fn data_point(&self, label: &str) -> Option<DataPoint> {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(label)
            .cloned()
    }

    /// Number of samples recorded for a label.
    pub fn count(&self, label: &str) -> u64 {
        self.data_point(label).map(|p| p.count).unwrap_or(0)
    }

    /// All aggregates, ordered by label.
    pub fn snapshot(&self) -> BTreeMap<String, DataPoint> {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(label, point)| (label.clone(), point.clone()))
            .collect()
    }

    /// Snapshot rendered as a JSON object keyed by label.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }

    /// Drop all recorded samples.
    pub fn reset(&self) {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Profiler for LatencyProfiler {
    fn add_data_point(&self, label: &str, duration_ms: f64) {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };

        let mut points = self.points.lock().unwrap_or_else(PoisonError::into_inner);
        points
            .entry(label.to_string())
            .or_default()
            .record(duration_ms);
    }
}
