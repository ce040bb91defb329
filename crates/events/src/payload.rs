//! Entities carried inside event arguments.
//!
//! These mirror what the upstream source sends; they are plain data with no
//! behaviour beyond serialisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenantrelay_core::{ChannelId, MessageId, TenantId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub bot: bool,
}

/// A user's membership in one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub tenant_id: TenantId,
    pub user: User,
    #[serde(default)]
    pub nickname: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// A message. `tenant_id` is `None` for direct messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub emoji: String,
}

/// A user started typing in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typing {
    pub channel_id: ChannelId,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub user_id: UserId,
    pub started_at: DateTime<Utc>,
}
