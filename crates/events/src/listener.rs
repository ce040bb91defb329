//! Listener handles and insertion-ordered listener sets.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::args::EventArgs;
use crate::event::RelayEvent;

/// A listener's deferred result. Resolves once the listener's async work settles.
pub type DeferredResult = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// What a listener invocation returned.
pub enum ListenerOutcome {
    /// Finished synchronously.
    Done,
    /// Failed synchronously.
    Failed(anyhow::Error),
    /// Work continues in the background; the relay does not wait for it.
    Deferred(DeferredResult),
}

impl ListenerOutcome {
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }
}

impl core::fmt::Debug for ListenerOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ListenerOutcome::Done => f.write_str("Done"),
            ListenerOutcome::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
            ListenerOutcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<()> for ListenerOutcome {
    fn from(_: ()) -> Self {
        ListenerOutcome::Done
    }
}

impl From<anyhow::Result<()>> for ListenerOutcome {
    fn from(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => ListenerOutcome::Done,
            Err(err) => ListenerOutcome::Failed(err),
        }
    }
}

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a listener handle. Clones of a [`Listener`] share it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type ErasedFn = dyn Fn(&EventArgs) -> ListenerOutcome + Send + Sync;

/// Callback for one event kind.
///
/// The handle is the listener's identity: keep it (or a clone) to unregister
/// later. Building a second handle from the same closure yields a different
/// listener.
pub struct Listener<E: RelayEvent> {
    id: ListenerId,
    call: Arc<ErasedFn>,
    _event: PhantomData<fn() -> E>,
}

impl<E: RelayEvent> Listener<E> {
    /// Wrap a synchronous callback. It may return `()`, `anyhow::Result<()>`
    /// or a [`ListenerOutcome`].
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&E::Args) -> R + Send + Sync + 'static,
        R: Into<ListenerOutcome>,
    {
        let call = move |event: &EventArgs| match E::args(event) {
            Some(args) => f(args).into(),
            // Registries are keyed by E::KIND, so other variants never reach here.
            None => ListenerOutcome::Done,
        };

        Self {
            id: ListenerId::next(),
            call: Arc::new(call),
            _event: PhantomData,
        }
    }

    /// Wrap a callback that starts async work. The returned future must own
    /// whatever it needs from the arguments.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(&E::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(move |args: &E::Args| ListenerOutcome::deferred(f(args)))
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) fn erase(&self) -> ErasedListener {
        ErasedListener {
            id: self.id,
            call: Arc::clone(&self.call),
        }
    }
}

impl<E: RelayEvent> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            call: Arc::clone(&self.call),
            _event: PhantomData,
        }
    }
}

impl<E: RelayEvent> core::fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &E::KIND)
            .finish()
    }
}

/// Kind-erased listener as stored in the registries.
#[derive(Clone)]
pub(crate) struct ErasedListener {
    id: ListenerId,
    call: Arc<ErasedFn>,
}

impl ErasedListener {
    pub(crate) fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) fn invoke(&self, args: &EventArgs) -> ListenerOutcome {
        (self.call)(args)
    }
}

/// Set of listeners that iterates in insertion order.
#[derive(Clone, Default)]
pub(crate) struct ListenerSet {
    listeners: Vec<ErasedListener>,
}

impl ListenerSet {
    /// Returns `false` if the listener was already present.
    pub(crate) fn insert(&mut self, listener: ErasedListener) -> bool {
        if self.contains(listener.id()) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Returns `false` if the listener was not present.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id() != id);
        self.listeners.len() != before
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id() == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Copy of the current members, for invoking outside the registry lock.
    pub(crate) fn snapshot(&self) -> Vec<ErasedListener> {
        self.listeners.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::HeartbeatArgs;
    use crate::event::Heartbeat;

    #[test]
    fn clones_share_identity_and_new_handles_do_not() {
        let a = Listener::<Heartbeat>::new(|_| ());
        let b = Listener::<Heartbeat>::new(|_| ());
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn set_dedupes_by_identity_and_keeps_insertion_order() {
        let a = Listener::<Heartbeat>::new(|_| ());
        let b = Listener::<Heartbeat>::new(|_| ());

        let mut set = ListenerSet::default();
        assert!(set.insert(b.erase()));
        assert!(set.insert(a.erase()));
        assert!(!set.insert(b.clone().erase()));

        let order: Vec<_> = set.snapshot().iter().map(|l| l.id()).collect();
        assert_eq!(order, vec![b.id(), a.id()]);

        assert!(set.remove(b.id()));
        assert!(!set.remove(b.id()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn callback_results_convert_into_outcomes() {
        let ok = Listener::<Heartbeat>::new(|args: &HeartbeatArgs| {
            anyhow::ensure!(args.latency_ms < 100, "slow heartbeat");
            Ok(())
        });
        let args = EventArgs::Heartbeat(HeartbeatArgs { latency_ms: 500 });

        match ok.erase().invoke(&args) {
            ListenerOutcome::Failed(err) => assert_eq!(err.to_string(), "slow heartbeat"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn async_callbacks_are_deferred() {
        let listener = Listener::<Heartbeat>::from_async(|_| async { anyhow::Ok(()) });
        let args = EventArgs::Heartbeat(HeartbeatArgs { latency_ms: 1 });
        assert!(matches!(
            listener.erase().invoke(&args),
            ListenerOutcome::Deferred(_)
        ));
    }
}
