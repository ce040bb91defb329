//! In-process event relay.
//!
//! One upstream [`EventSource`] delivers raw occurrences; the [`EventRelay`]
//! converts them into typed arguments, resolves the tenant of tenant-scoped
//! kinds and fans each occurrence out to tenant listeners and "any" listeners.
//!
//! ```ignore
//! let source = Arc::new(InMemoryEventSource::new());
//! let relay = EventRelay::new(Arc::clone(&source), LatencyProfiler::new());
//!
//! let greeter = Listener::<event::Join>::new(|args| {
//!     println!("{} joined", args.member.user.name);
//! });
//! relay.on_tenant_event(tenant_id, &greeter);
//!
//! source.emit(raw_join)?;
//! relay.off_tenant_event(tenant_id, &greeter);
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod event;
pub mod in_memory_source;
pub mod kind;
pub mod listener;
pub mod payload;
pub mod raw;
pub mod relay;
pub mod source;
pub mod tenant;

mod registry;

pub use args::EventArgs;
pub use config::{FailurePolicy, RelayConfig};
pub use error::RelayError;
pub use event::{RelayEvent, TenantEvent};
pub use in_memory_source::InMemoryEventSource;
pub use kind::EventKind;
pub use listener::{DeferredResult, Listener, ListenerId, ListenerOutcome};
pub use raw::RawEvent;
pub use relay::EventRelay;
pub use source::{EventSource, UpstreamHandler};
pub use tenant::TenantScoped;
