use thiserror::Error;

use crate::kind::EventKind;

/// Errors surfaced by the relay to the event source's calling context.
///
/// Subscribe/unsubscribe never fail; only dispatch and decoding do.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A listener failed synchronously and the relay is configured to propagate.
    #[error("listener for `{kind}` failed: {source}")]
    ListenerFailed {
        kind: EventKind,
        #[source]
        source: anyhow::Error,
    },

    /// A raw occurrence could not be decoded.
    #[error("failed to decode raw event: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RelayError {
    pub fn listener_failed(kind: EventKind, source: anyhow::Error) -> Self {
        Self::ListenerFailed { kind, source }
    }
}
