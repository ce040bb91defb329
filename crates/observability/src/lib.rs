//! Tracing, logging and latency profiling (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Latency profiling of listener invocations.
pub mod metrics;

pub use metrics::{DataPoint, LatencyProfiler, NoopProfiler, Profiler};
