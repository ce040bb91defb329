//! Core error model.

use thiserror::Error;

/// Errors produced while parsing identifiers and kinds coming from the outside.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// An event kind name is not part of the known set.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),
}

impl CoreError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_event_kind(name: impl Into<String>) -> Self {
        Self::UnknownEventKind(name.into())
    }
}
