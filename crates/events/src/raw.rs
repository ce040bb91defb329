//! Raw occurrences as delivered by the upstream event source.

use serde::{Deserialize, Serialize};

use crate::args::{HeartbeatArgs, ReadyArgs};
use crate::error::RelayError;
use crate::kind::EventKind;
use crate::payload::{Member, Message, Reaction, Tenant, Typing, User};

/// One upstream occurrence: an event kind plus its positional argument tuple.
///
/// Over the wire this is `{"kind": "<kind>", "args": <value or array>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "args", rename_all = "snake_case")]
pub enum RawEvent {
    Ready(ReadyArgs),
    TenantAvailable(Tenant),
    TenantUnavailable(Tenant),
    Join(Member),
    Leave(Member),
    /// `(old, new)`
    MemberUpdate(Member, Member),
    Message(Message),
    /// `(old, new)`
    MessageUpdate(Message, Message),
    MessageDelete(Message),
    /// `(reaction, reacting user)`
    ReactionAdd(Reaction, User),
    TypingStart(Typing),
    /// `(old, new)`
    UserUpdate(User, User),
    Heartbeat(HeartbeatArgs),
}

impl RawEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RawEvent::Ready(..) => EventKind::Ready,
            RawEvent::TenantAvailable(..) => EventKind::TenantAvailable,
            RawEvent::TenantUnavailable(..) => EventKind::TenantUnavailable,
            RawEvent::Join(..) => EventKind::Join,
            RawEvent::Leave(..) => EventKind::Leave,
            RawEvent::MemberUpdate(..) => EventKind::MemberUpdate,
            RawEvent::Message(..) => EventKind::Message,
            RawEvent::MessageUpdate(..) => EventKind::MessageUpdate,
            RawEvent::MessageDelete(..) => EventKind::MessageDelete,
            RawEvent::ReactionAdd(..) => EventKind::ReactionAdd,
            RawEvent::TypingStart(..) => EventKind::TypingStart,
            RawEvent::UserUpdate(..) => EventKind::UserUpdate,
            RawEvent::Heartbeat(..) => EventKind::Heartbeat,
        }
    }

    /// Decode a JSON-encoded occurrence.
    pub fn from_json(json: &str) -> Result<Self, RelayError> {
        Ok(serde_json::from_str(json)?)
    }
}
