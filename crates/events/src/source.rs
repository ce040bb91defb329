//! Upstream event source abstraction.
//!
//! The event source is whatever delivers raw occurrences to the process (a
//! gateway connection, a test harness, a replay file). The relay only needs
//! one capability from it: register a handler for a kind.
//!
//! ## Delivery guarantees
//!
//! - **Live stream**: nothing is persisted or replayed.
//! - **At most once per handler**: no retries.
//! - **Receipt order**: handlers see occurrences in the order the source emits
//!   them; the relay adds no reordering or batching.

use std::sync::Arc;

use crate::error::RelayError;
use crate::kind::EventKind;
use crate::raw::RawEvent;

/// Handler the relay registers once per kind.
///
/// Errors are listener failures the relay chose to propagate; the source
/// hands them to whoever drives it.
pub type UpstreamHandler = Arc<dyn Fn(RawEvent) -> Result<(), RelayError> + Send + Sync>;

/// Source of raw occurrences.
///
/// Implementations must call the handler once per occurrence of `kind`, in
/// receipt order. They must not hold internal locks while calling handlers,
/// because handlers may subscribe further kinds re-entrantly.
pub trait EventSource: Send + Sync {
    fn subscribe(&self, kind: EventKind, handler: UpstreamHandler);
}

impl<S> EventSource for Arc<S>
where
    S: EventSource + ?Sized,
{
    fn subscribe(&self, kind: EventKind, handler: UpstreamHandler) {
        (**self).subscribe(kind, handler)
    }
}
