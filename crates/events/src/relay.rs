//! The event relay: per-tenant and global fan-out over one upstream subscription per kind.
//!
//! ```text
//! EventSource ──(one handler per kind)──► EventRelay::relay_event
//!                                              │
//!                        convert RawEvent ─► EventArgs
//!                                              │
//!                 tenant-scoped? resolve tenant ─► tenant listeners (insertion order)
//!                                              │
//!                                              └─► any listeners (insertion order)
//!                                                        │
//!                                  one profiler sample per invocation ("event:<kind>")
//! ```
//!
//! Registries and the subscribed-kinds set sit behind one mutex. Dispatch
//! copies the listener lists it needs and releases the lock before invoking
//! anything, so listeners may register or unregister re-entrantly. A listener
//! added during an occurrence is first called for the next one; a listener
//! removed during an occurrence is skipped if it has not been reached yet.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::runtime::Handle;
use tracing::{debug, error, trace, warn};

use tenantrelay_core::TenantId;
use tenantrelay_observability::Profiler;

use crate::args::EventArgs;
use crate::config::{FailurePolicy, RelayConfig};
use crate::error::RelayError;
use crate::event::{RelayEvent, TenantEvent};
use crate::kind::EventKind;
use crate::listener::{DeferredResult, ErasedListener, Listener, ListenerOutcome};
use crate::raw::RawEvent;
use crate::registry::{GlobalRegistry, TenantRegistry};
use crate::source::{EventSource, UpstreamHandler};

/// Relays upstream occurrences to tenant-scoped and global listeners.
///
/// Subscribing never fails and never blocks on listeners. The first listener
/// registered for a kind (through either registry) subscribes the relay to
/// that kind upstream; that subscription lives as long as the relay.
pub struct EventRelay {
    state: Arc<RelayState>,
}

struct RelayState {
    source: Arc<dyn EventSource>,
    profiler: Arc<dyn Profiler>,
    config: RelayConfig,
    runtime: Option<Handle>,
    registries: Mutex<Registries>,
}

#[derive(Default)]
struct Registries {
    tenants: TenantRegistry,
    global: GlobalRegistry,
    /// Only grows: there is no upstream unsubscribe.
    subscribed: BTreeSet<EventKind>,
}

impl EventRelay {
    pub fn new<S, P>(source: S, profiler: P) -> Self
    where
        S: EventSource + 'static,
        P: Profiler + 'static,
    {
        Self::with_config(source, profiler, RelayConfig::default())
    }

    pub fn with_config<S, P>(source: S, profiler: P, config: RelayConfig) -> Self
    where
        S: EventSource + 'static,
        P: Profiler + 'static,
    {
        let runtime = config
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok());

        Self {
            state: Arc::new(RelayState {
                source: Arc::new(source),
                profiler: Arc::new(profiler),
                config,
                runtime,
                registries: Mutex::new(Registries::default()),
            }),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.state.config
    }

    /// Listen to occurrences of `E` that resolve to `tenant_id`.
    pub fn on_tenant_event<E: TenantEvent>(&self, tenant_id: TenantId, listener: &Listener<E>) {
        let added = self
            .state
            .lock()
            .tenants
            .add(tenant_id, E::KIND, listener.erase());
        if added {
            trace!(
                event = %E::KIND,
                tenant = %tenant_id,
                listener = ?listener.id(),
                "tenant listener added"
            );
        }
        self.state.ensure_subscribed(E::KIND);
    }

    /// Stop a tenant listener. Unknown tenants, kinds or listeners are ignored.
    pub fn off_tenant_event<E: TenantEvent>(&self, tenant_id: TenantId, listener: &Listener<E>) {
        self.state
            .lock()
            .tenants
            .remove(tenant_id, E::KIND, listener.id());
    }

    /// Listen to every occurrence of `E`, whether or not it resolves to a tenant.
    pub fn on_any_event<E: RelayEvent>(&self, listener: &Listener<E>) {
        let added = self.state.lock().global.add(E::KIND, listener.erase());
        if added {
            trace!(event = %E::KIND, listener = ?listener.id(), "any listener added");
        }
        self.state.ensure_subscribed(E::KIND);
    }

    /// Stop an "any" listener. Unknown kinds or listeners are ignored.
    pub fn off_any_event<E: RelayEvent>(&self, listener: &Listener<E>) {
        self.state.lock().global.remove(E::KIND, listener.id());
    }

    /// Drop every listener registered for a tenant (e.g. when the tenant is
    /// unloaded). Returns how many were removed.
    pub fn off_tenant(&self, tenant_id: TenantId) -> usize {
        let removed = self.state.lock().tenants.remove_tenant(tenant_id);
        debug!(tenant = %tenant_id, removed, "tenant listeners dropped");
        removed
    }

    /// Whether an upstream handler has been registered for `kind`.
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.state.lock().subscribed.contains(&kind)
    }

    /// Kinds with an upstream handler, in declaration order.
    pub fn subscribed_kinds(&self) -> Vec<EventKind> {
        self.state.lock().subscribed.iter().copied().collect()
    }

    pub fn tenant_listener_count(&self, tenant_id: TenantId, kind: EventKind) -> usize {
        self.state.lock().tenants.count(tenant_id, kind)
    }

    pub fn any_listener_count(&self, kind: EventKind) -> usize {
        self.state.lock().global.count(kind)
    }
}

impl core::fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventRelay")
            .field("config", &self.state.config)
            .field("subscribed", &self.subscribed_kinds())
            .finish()
    }
}

impl RelayState {
    fn lock(&self) -> MutexGuard<'_, Registries> {
        self.registries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register the upstream handler for `kind` unless one already exists.
    fn ensure_subscribed(self: &Arc<Self>, kind: EventKind) {
        let newly_subscribed = self.lock().subscribed.insert(kind);
        if !newly_subscribed {
            return;
        }

        // Weak: the source may outlive the relay; after that the handler does nothing.
        let state = Arc::downgrade(self);
        let handler: UpstreamHandler = Arc::new(move |raw: RawEvent| match state.upgrade() {
            Some(state) => state.relay_event(raw),
            None => Ok(()),
        });

        self.source.subscribe(kind, handler);
        debug!(event = %kind, "subscribed to upstream event");
    }

    fn relay_event(&self, raw: RawEvent) -> Result<(), RelayError> {
        let kind = raw.kind();
        let args = EventArgs::from_raw(raw);
        let tenant_id = if kind.is_tenant_scoped() {
            args.tenant_id()
        } else {
            None
        };

        let (tenant_listeners, any_listeners) = {
            let registries = self.lock();
            let tenant_listeners = tenant_id
                .map(|tenant_id| registries.tenants.listeners(tenant_id, kind))
                .unwrap_or_default();
            (tenant_listeners, registries.global.listeners(kind))
        };

        trace!(
            event = %kind,
            tenant = ?tenant_id,
            tenant_listeners = tenant_listeners.len(),
            any_listeners = any_listeners.len(),
            "relaying event"
        );

        // Tenant listeners first, then "any" listeners.
        if let Some(tenant_id) = tenant_id {
            for listener in &tenant_listeners {
                if self.still_registered(Some(tenant_id), kind, listener) {
                    self.invoke(kind, listener, &args)?;
                }
            }
        }
        for listener in &any_listeners {
            if self.still_registered(None, kind, listener) {
                self.invoke(kind, listener, &args)?;
            }
        }

        Ok(())
    }

    /// Whether a snapshotted listener was not removed by an earlier listener
    /// of the same occurrence.
    fn still_registered(
        &self,
        tenant_id: Option<TenantId>,
        kind: EventKind,
        listener: &ErasedListener,
    ) -> bool {
        let registries = self.lock();
        match tenant_id {
            Some(tenant_id) => registries.tenants.contains(tenant_id, kind, listener.id()),
            None => registries.global.contains(kind, listener.id()),
        }
    }

    fn invoke(
        &self,
        kind: EventKind,
        listener: &ErasedListener,
        args: &EventArgs,
    ) -> Result<(), RelayError> {
        let started = Instant::now();

        match listener.invoke(args) {
            ListenerOutcome::Done => {
                self.record(kind, started);
                Ok(())
            }
            ListenerOutcome::Failed(err) => {
                self.record(kind, started);
                match self.config.failure_policy {
                    FailurePolicy::Propagate => Err(RelayError::listener_failed(kind, err)),
                    FailurePolicy::Isolate => {
                        warn!(
                            event = %kind,
                            listener = ?listener.id(),
                            error = %err,
                            "listener failed"
                        );
                        Ok(())
                    }
                }
            }
            ListenerOutcome::Deferred(result) => {
                self.settle(kind, started, result);
                Ok(())
            }
        }
    }

    /// Await a deferred result in the background and record its sample on settlement.
    fn settle(&self, kind: EventKind, started: Instant, result: DeferredResult) {
        // Prefer the configured handle, else whatever runtime is driving dispatch.
        let runtime = self.runtime.clone().or_else(|| Handle::try_current().ok());
        let Some(runtime) = runtime else {
            error!(
                event = %kind,
                "no tokio runtime to drive a deferred listener result; dropping it"
            );
            self.record(kind, started);
            return;
        };

        let profiler = self.config.profiling.then(|| Arc::clone(&self.profiler));
        runtime.spawn(async move {
            if let Err(err) = result.await {
                warn!(event = %kind, error = %err, "deferred listener failed");
            }
            if let Some(profiler) = profiler {
                profiler.add_data_point(&kind.profiler_label(), elapsed_ms(started));
            }
        });
    }

    fn record(&self, kind: EventKind, started: Instant) {
        if self.config.profiling {
            self.profiler
                .add_data_point(&kind.profiler_label(), elapsed_ms(started));
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
