//! Strongly-typed identifiers carried inside event payloads.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Declares a `Uuid`-backed id that serializes as the bare uuid string and
/// parses with an error naming the id type.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh time-ordered (v7) id.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self).map_err(|e| {
                    CoreError::invalid_id(format!("{}: {}", stringify!($name), e))
                })
            }
        }
    };
}

uuid_id!(
    /// Identifier of a tenant (the partition a tenant-scoped event belongs to).
    TenantId
);
uuid_id!(
    /// Identifier of a user.
    UserId
);
uuid_id!(
    /// Identifier of a channel. Channels may live inside a tenant or outside any tenant.
    ChannelId
);
uuid_id!(MessageId);
