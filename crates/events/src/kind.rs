//! The closed set of event kinds the relay understands.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tenantrelay_core::CoreError;

/// Discriminator of an upstream occurrence.
///
/// Kinds are split into *tenant-scoped* kinds (the typed arguments carry the
/// tenant the occurrence belongs to) and kinds without tenant scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Ready,
    TenantAvailable,
    TenantUnavailable,
    Join,
    Leave,
    MemberUpdate,
    Message,
    MessageUpdate,
    MessageDelete,
    ReactionAdd,
    TypingStart,
    UserUpdate,
    Heartbeat,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 13] = [
        EventKind::Ready,
        EventKind::TenantAvailable,
        EventKind::TenantUnavailable,
        EventKind::Join,
        EventKind::Leave,
        EventKind::MemberUpdate,
        EventKind::Message,
        EventKind::MessageUpdate,
        EventKind::MessageDelete,
        EventKind::ReactionAdd,
        EventKind::TypingStart,
        EventKind::UserUpdate,
        EventKind::Heartbeat,
    ];

    /// Stable wire name (also used in profiler labels).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::TenantAvailable => "tenant_available",
            EventKind::TenantUnavailable => "tenant_unavailable",
            EventKind::Join => "join",
            EventKind::Leave => "leave",
            EventKind::MemberUpdate => "member_update",
            EventKind::Message => "message",
            EventKind::MessageUpdate => "message_update",
            EventKind::MessageDelete => "message_delete",
            EventKind::ReactionAdd => "reaction_add",
            EventKind::TypingStart => "typing_start",
            EventKind::UserUpdate => "user_update",
            EventKind::Heartbeat => "heartbeat",
        }
    }

    /// Whether a tenant resolver exists for this kind.
    ///
    /// Must agree with the resolver table in [`crate::EventArgs::tenant_id`].
    pub fn is_tenant_scoped(&self) -> bool {
        !matches!(
            self,
            EventKind::Ready | EventKind::UserUpdate | EventKind::Heartbeat
        )
    }

    /// Label under which listener latency is profiled.
    pub fn profiler_label(&self) -> String {
        format!("event:{}", self.as_str())
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::unknown_event_kind(s))
    }
}
