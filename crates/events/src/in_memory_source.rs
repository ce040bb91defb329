//! In-memory event source for tests/dev.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::RelayError;
use crate::kind::EventKind;
use crate::raw::RawEvent;
use crate::source::{EventSource, UpstreamHandler};

/// In-memory event source.
///
/// - No IO / no async
/// - `emit` runs handlers on the caller's thread, in registration order
/// - The first handler error stops the remaining handlers for that occurrence
#[derive(Default)]
pub struct InMemoryEventSource {
    handlers: Mutex<HashMap<EventKind, Vec<UpstreamHandler>>>,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one occurrence to every handler registered for its kind.
    pub fn emit(&self, raw: RawEvent) -> Result<(), RelayError> {
        let handlers = self.handlers_for(raw.kind());

        match handlers.split_last() {
            None => Ok(()),
            Some((last, rest)) => {
                for handler in rest {
                    handler(raw.clone())?;
                }
                last(raw)
            }
        }
    }

    /// Decode a JSON occurrence and deliver it.
    pub fn emit_json(&self, json: &str) -> Result<(), RelayError> {
        self.emit(RawEvent::from_json(json)?)
    }

    /// Number of upstream handlers registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.lock().get(&kind).map(Vec::len).unwrap_or(0)
    }

    fn handlers_for(&self, kind: EventKind) -> Vec<UpstreamHandler> {
        // Cloned so handlers run without the lock held.
        self.lock().get(&kind).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<EventKind, Vec<UpstreamHandler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSource for InMemoryEventSource {
    fn subscribe(&self, kind: EventKind, handler: UpstreamHandler) {
        self.lock().entry(kind).or_default().push(handler);
    }
}

impl core::fmt::Debug for InMemoryEventSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kinds: Vec<EventKind> = self.lock().keys().copied().collect();
        f.debug_struct("InMemoryEventSource")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::args::HeartbeatArgs;

    fn heartbeat() -> RawEvent {
        RawEvent::Heartbeat(HeartbeatArgs { latency_ms: 10 })
    }

    #[test]
    fn routes_occurrences_by_kind() {
        let source = InMemoryEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        source.subscribe(
            EventKind::Heartbeat,
            Arc::new(move |_: RawEvent| -> Result<(), RelayError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        source.emit(heartbeat()).unwrap();
        source.emit(heartbeat()).unwrap();
        source
            .emit_json(r#"{"kind":"heartbeat","args":{"latency_ms":3}}"#)
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(source.handler_count(EventKind::Heartbeat), 1);
        assert_eq!(source.handler_count(EventKind::Ready), 0);
    }

    #[test]
    fn emitting_without_handlers_is_a_no_op() {
        let source = InMemoryEventSource::new();
        assert!(source.emit(heartbeat()).is_ok());
    }

    #[test]
    fn first_handler_error_is_returned() {
        let source = InMemoryEventSource::new();
        let reached = Arc::new(AtomicUsize::new(0));

        source.subscribe(
            EventKind::Heartbeat,
            Arc::new(|_: RawEvent| -> Result<(), RelayError> {
                Err(RelayError::listener_failed(
                    EventKind::Heartbeat,
                    anyhow::anyhow!("boom"),
                ))
            }),
        );
        let counter = Arc::clone(&reached);
        source.subscribe(
            EventKind::Heartbeat,
            Arc::new(move |_: RawEvent| -> Result<(), RelayError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let err = source.emit(heartbeat()).unwrap_err();
        assert!(matches!(err, RelayError::ListenerFailed { .. }));
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }
}
