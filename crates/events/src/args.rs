//! Typed event arguments and the per-kind converter table.

use serde::{Deserialize, Serialize};

use tenantrelay_core::{TenantId, UserId};

use crate::kind::EventKind;
use crate::payload::{Member, Message, Reaction, Tenant, Typing, User};
use crate::raw::RawEvent;
use crate::tenant::TenantScoped;

/// The relay's own session became ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyArgs {
    pub user_id: UserId,
    #[serde(default)]
    pub tenant_ids: Vec<TenantId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatArgs {
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantArgs {
    pub tenant: Tenant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberArgs {
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberUpdateArgs {
    pub old_member: Member,
    pub new_member: Member,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArgs {
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageUpdateArgs {
    pub old_message: Message,
    pub new_message: Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionArgs {
    pub reaction: Reaction,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdateArgs {
    pub old_user: User,
    pub new_user: User,
}

/// Converted arguments of one occurrence, one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    Ready(ReadyArgs),
    TenantAvailable(TenantArgs),
    TenantUnavailable(TenantArgs),
    Join(MemberArgs),
    Leave(MemberArgs),
    MemberUpdate(MemberUpdateArgs),
    Message(MessageArgs),
    MessageUpdate(MessageUpdateArgs),
    MessageDelete(MessageArgs),
    ReactionAdd(ReactionArgs),
    TypingStart(Typing),
    UserUpdate(UserUpdateArgs),
    Heartbeat(HeartbeatArgs),
}

impl EventArgs {
    /// Convert a raw occurrence into its typed arguments.
    ///
    /// `ready`, `typing_start` and `heartbeat` have no converter; their raw
    /// value is passed through unchanged.
    pub fn from_raw(raw: RawEvent) -> Self {
        match raw {
            RawEvent::Ready(args) => EventArgs::Ready(args),
            RawEvent::TenantAvailable(tenant) => EventArgs::TenantAvailable(TenantArgs { tenant }),
            RawEvent::TenantUnavailable(tenant) => {
                EventArgs::TenantUnavailable(TenantArgs { tenant })
            }
            RawEvent::Join(member) => EventArgs::Join(MemberArgs { member }),
            RawEvent::Leave(member) => EventArgs::Leave(MemberArgs { member }),
            RawEvent::MemberUpdate(old_member, new_member) => {
                EventArgs::MemberUpdate(MemberUpdateArgs {
                    old_member,
                    new_member,
                })
            }
            RawEvent::Message(message) => EventArgs::Message(MessageArgs { message }),
            RawEvent::MessageUpdate(old_message, new_message) => {
                EventArgs::MessageUpdate(MessageUpdateArgs {
                    old_message,
                    new_message,
                })
            }
            RawEvent::MessageDelete(message) => EventArgs::MessageDelete(MessageArgs { message }),
            RawEvent::ReactionAdd(reaction, user) => {
                EventArgs::ReactionAdd(ReactionArgs { reaction, user })
            }
            RawEvent::TypingStart(typing) => EventArgs::TypingStart(typing),
            RawEvent::UserUpdate(old_user, new_user) => {
                EventArgs::UserUpdate(UserUpdateArgs { old_user, new_user })
            }
            RawEvent::Heartbeat(args) => EventArgs::Heartbeat(args),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EventArgs::Ready(..) => EventKind::Ready,
            EventArgs::TenantAvailable(..) => EventKind::TenantAvailable,
            EventArgs::TenantUnavailable(..) => EventKind::TenantUnavailable,
            EventArgs::Join(..) => EventKind::Join,
            EventArgs::Leave(..) => EventKind::Leave,
            EventArgs::MemberUpdate(..) => EventKind::MemberUpdate,
            EventArgs::Message(..) => EventKind::Message,
            EventArgs::MessageUpdate(..) => EventKind::MessageUpdate,
            EventArgs::MessageDelete(..) => EventKind::MessageDelete,
            EventArgs::ReactionAdd(..) => EventKind::ReactionAdd,
            EventArgs::TypingStart(..) => EventKind::TypingStart,
            EventArgs::UserUpdate(..) => EventKind::UserUpdate,
            EventArgs::Heartbeat(..) => EventKind::Heartbeat,
        }
    }

    /// Tenant resolver table.
    ///
    /// Kinds without tenant scope have no entry and always yield `None`;
    /// tenant-scoped kinds yield `None` when the payload carries no tenant
    /// (e.g. a direct message).
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            EventArgs::TenantAvailable(args) | EventArgs::TenantUnavailable(args) => {
                args.tenant_id()
            }
            EventArgs::Join(args) | EventArgs::Leave(args) => args.tenant_id(),
            EventArgs::MemberUpdate(args) => args.tenant_id(),
            EventArgs::Message(args) | EventArgs::MessageDelete(args) => args.tenant_id(),
            EventArgs::MessageUpdate(args) => args.tenant_id(),
            EventArgs::ReactionAdd(args) => args.tenant_id(),
            EventArgs::TypingStart(args) => args.tenant_id(),
            EventArgs::Ready(..) | EventArgs::UserUpdate(..) | EventArgs::Heartbeat(..) => None,
        }
    }
}

impl From<RawEvent> for EventArgs {
    fn from(raw: RawEvent) -> Self {
        EventArgs::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tenantrelay_core::{ChannelId, MessageId};

    use super::*;

    fn user(name: &str) -> User {
        User {
            id: UserId::new(),
            name: name.to_string(),
            bot: false,
        }
    }

    fn message(tenant_id: Option<TenantId>, content: &str) -> Message {
        Message {
            id: MessageId::new(),
            channel_id: ChannelId::new(),
            tenant_id,
            author: user("ada"),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn converts_tuples_into_named_fields() {
        let tenant = TenantId::new();
        let old = message(Some(tenant), "before");
        let new = message(Some(tenant), "after");

        let args = EventArgs::from_raw(RawEvent::MessageUpdate(old.clone(), new.clone()));
        assert_eq!(
            args,
            EventArgs::MessageUpdate(MessageUpdateArgs {
                old_message: old,
                new_message: new,
            })
        );
        assert_eq!(args.kind(), EventKind::MessageUpdate);
        assert_eq!(args.tenant_id(), Some(tenant));
    }

    #[test]
    fn passes_through_kinds_without_converter() {
        let raw = RawEvent::Heartbeat(HeartbeatArgs { latency_ms: 7 });
        assert_eq!(
            EventArgs::from_raw(raw),
            EventArgs::Heartbeat(HeartbeatArgs { latency_ms: 7 })
        );
    }

    #[test]
    fn direct_messages_resolve_to_no_tenant() {
        let args = EventArgs::from_raw(RawEvent::Message(message(None, "hi")));
        assert!(args.kind().is_tenant_scoped());
        assert_eq!(args.tenant_id(), None);
    }

    #[test]
    fn resolver_table_agrees_with_tenant_scoped_kinds() {
        let tenant = TenantId::new();
        let member = Member {
            tenant_id: tenant,
            user: user("grace"),
            nickname: None,
            joined_at: Utc::now(),
        };
        let typing = Typing {
            channel_id: ChannelId::new(),
            tenant_id: Some(tenant),
            user_id: UserId::new(),
            started_at: Utc::now(),
        };
        let reaction = Reaction {
            message_id: MessageId::new(),
            channel_id: ChannelId::new(),
            tenant_id: Some(tenant),
            emoji: "+1".to_string(),
        };
        let tenant_payload = Tenant {
            id: tenant,
            name: "t".to_string(),
        };

        let samples = vec![
            RawEvent::Ready(ReadyArgs {
                user_id: UserId::new(),
                tenant_ids: vec![tenant],
            }),
            RawEvent::TenantAvailable(tenant_payload.clone()),
            RawEvent::TenantUnavailable(tenant_payload),
            RawEvent::Join(member.clone()),
            RawEvent::Leave(member.clone()),
            RawEvent::MemberUpdate(member.clone(), member),
            RawEvent::Message(message(Some(tenant), "a")),
            RawEvent::MessageUpdate(message(Some(tenant), "a"), message(Some(tenant), "b")),
            RawEvent::MessageDelete(message(Some(tenant), "a")),
            RawEvent::ReactionAdd(reaction, user("x")),
            RawEvent::TypingStart(typing),
            RawEvent::UserUpdate(user("old"), user("new")),
            RawEvent::Heartbeat(HeartbeatArgs { latency_ms: 1 }),
        ];

        assert_eq!(samples.len(), EventKind::ALL.len());
        for raw in samples {
            let kind = raw.kind();
            let args = EventArgs::from_raw(raw);
            assert_eq!(args.kind(), kind);
            assert_eq!(args.tenant_id().is_some(), kind.is_tenant_scoped(), "{kind}");
        }
    }
}
