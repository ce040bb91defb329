//! Listener registries.
//!
//! Entries are created on first registration and never pruned when their last
//! listener is removed: an empty set behaves exactly like a missing one, and
//! the key space (tenants x kinds) stays small. A tenant's entries can be
//! dropped wholesale with [`TenantRegistry::remove_tenant`].

use std::collections::HashMap;

use tenantrelay_core::TenantId;

use crate::kind::EventKind;
use crate::listener::{ErasedListener, ListenerId, ListenerSet};

/// tenant -> kind -> listeners
#[derive(Default)]
pub(crate) struct TenantRegistry {
    tenants: HashMap<TenantId, HashMap<EventKind, ListenerSet>>,
}

impl TenantRegistry {
    pub(crate) fn add(
        &mut self,
        tenant_id: TenantId,
        kind: EventKind,
        listener: ErasedListener,
    ) -> bool {
        self.tenants
            .entry(tenant_id)
            .or_default()
            .entry(kind)
            .or_default()
            .insert(listener)
    }

    pub(crate) fn remove(&mut self, tenant_id: TenantId, kind: EventKind, id: ListenerId) -> bool {
        self.tenants
            .get_mut(&tenant_id)
            .and_then(|kinds| kinds.get_mut(&kind))
            .map(|set| set.remove(id))
            .unwrap_or(false)
    }

    /// Drop every entry of a tenant; returns the number of listeners removed.
    pub(crate) fn remove_tenant(&mut self, tenant_id: TenantId) -> usize {
        self.tenants
            .remove(&tenant_id)
            .map(|kinds| kinds.values().map(ListenerSet::len).sum())
            .unwrap_or(0)
    }

    pub(crate) fn listeners(&self, tenant_id: TenantId, kind: EventKind) -> Vec<ErasedListener> {
        self.get(tenant_id, kind)
            .map(ListenerSet::snapshot)
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, tenant_id: TenantId, kind: EventKind) -> usize {
        self.get(tenant_id, kind).map(ListenerSet::len).unwrap_or(0)
    }

    pub(crate) fn contains(&self, tenant_id: TenantId, kind: EventKind, id: ListenerId) -> bool {
        self.get(tenant_id, kind).is_some_and(|set| set.contains(id))
    }

    #[cfg(test)]
    pub(crate) fn has_entry(&self, tenant_id: TenantId, kind: EventKind) -> bool {
        self.get(tenant_id, kind).is_some()
    }

    fn get(&self, tenant_id: TenantId, kind: EventKind) -> Option<&ListenerSet> {
        self.tenants.get(&tenant_id)?.get(&kind)
    }
}

/// kind -> listeners
#[derive(Default)]
pub(crate) struct GlobalRegistry {
    kinds: HashMap<EventKind, ListenerSet>,
}

impl GlobalRegistry {
    pub(crate) fn add(&mut self, kind: EventKind, listener: ErasedListener) -> bool {
        self.kinds.entry(kind).or_default().insert(listener)
    }

    pub(crate) fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.kinds
            .get_mut(&kind)
            .map(|set| set.remove(id))
            .unwrap_or(false)
    }

    pub(crate) fn listeners(&self, kind: EventKind) -> Vec<ErasedListener> {
        self.kinds
            .get(&kind)
            .filter(|set| !set.is_empty())
            .map(ListenerSet::snapshot)
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.kinds.get(&kind).map(ListenerSet::len).unwrap_or(0)
    }

    pub(crate) fn contains(&self, kind: EventKind, id: ListenerId) -> bool {
        self.kinds.get(&kind).is_some_and(|set| set.contains(id))
    }
}
