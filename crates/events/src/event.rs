//! Compile-time mapping from event kind to typed arguments.
//!
//! Each kind has a zero-sized marker type implementing [`RelayEvent`]. Listeners
//! are typed by marker, so a listener for [`Join`] receives `&MemberArgs` and
//! can only be registered under [`EventKind::Join`]. Markers of tenant-scoped
//! kinds also implement [`TenantEvent`], which is what `on_tenant_event`
//! requires.

use crate::args::{
    EventArgs, HeartbeatArgs, MemberArgs, MemberUpdateArgs, MessageArgs, MessageUpdateArgs,
    ReactionArgs, ReadyArgs, TenantArgs, UserUpdateArgs,
};
use crate::kind::EventKind;
use crate::payload::Typing;
use crate::tenant::TenantScoped;

/// A kind of event, known at compile time.
pub trait RelayEvent: Send + Sync + 'static {
    const KIND: EventKind;

    /// Typed arguments delivered to listeners of this kind.
    type Args: core::fmt::Debug + Send + Sync + 'static;

    /// Borrow this kind's arguments out of the tagged union.
    fn args(event: &EventArgs) -> Option<&Self::Args>;
}

/// A kind whose occurrences resolve to a tenant.
pub trait TenantEvent: RelayEvent<Args: TenantScoped> {}

macro_rules! relay_event {
    ($(#[$meta:meta])* $name:ident => $args:ty) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $name;

        impl RelayEvent for $name {
            const KIND: EventKind = EventKind::$name;
            type Args = $args;

            fn args(event: &EventArgs) -> Option<&Self::Args> {
                match event {
                    EventArgs::$name(args) => Some(args),
                    _ => None,
                }
            }
        }
    };
    ($(#[$meta:meta])* tenant $name:ident => $args:ty) => {
        relay_event!($(#[$meta])* $name => $args);

        impl TenantEvent for $name {}
    };
}

relay_event!(
    /// The upstream session is ready.
    Ready => ReadyArgs
);
relay_event!(tenant TenantAvailable => TenantArgs);
relay_event!(tenant TenantUnavailable => TenantArgs);
relay_event!(
    /// A member joined a tenant.
    tenant Join => MemberArgs
);
relay_event!(tenant Leave => MemberArgs);
relay_event!(tenant MemberUpdate => MemberUpdateArgs);
relay_event!(tenant Message => MessageArgs);
relay_event!(tenant MessageUpdate => MessageUpdateArgs);
relay_event!(tenant MessageDelete => MessageArgs);
relay_event!(tenant ReactionAdd => ReactionArgs);
relay_event!(tenant TypingStart => Typing);
relay_event!(UserUpdate => UserUpdateArgs);
relay_event!(Heartbeat => HeartbeatArgs);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_borrow_only_their_own_variant() {
        let args = EventArgs::Heartbeat(HeartbeatArgs { latency_ms: 3 });
        assert_eq!(Heartbeat::args(&args).map(|a| a.latency_ms), Some(3));
        assert!(Ready::args(&args).is_none());
        assert_eq!(<Heartbeat as RelayEvent>::KIND, EventKind::Heartbeat);
    }

    fn tenant_kind<E: TenantEvent>() -> EventKind {
        E::KIND
    }

    #[test]
    fn tenant_markers_are_tenant_scoped_kinds() {
        assert!(tenant_kind::<Join>().is_tenant_scoped());
        assert!(tenant_kind::<Message>().is_tenant_scoped());
        assert!(tenant_kind::<TypingStart>().is_tenant_scoped());
    }
}
