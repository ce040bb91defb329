use tenantrelay_core::TenantId;

use crate::args::{
    MemberArgs, MemberUpdateArgs, MessageArgs, MessageUpdateArgs, ReactionArgs, TenantArgs,
};
use crate::payload::Typing;

/// Tenant resolver for the typed arguments of a tenant-scoped event kind.
///
/// Only argument types of tenant-scoped kinds implement this trait; having an
/// implementation is what makes a kind tenant-scoped. Returning `None` means
/// the occurrence cannot be attributed to a tenant (e.g. a direct message) and
/// is delivered to "any" listeners only.
pub trait TenantScoped {
    fn tenant_id(&self) -> Option<TenantId>;
}

impl TenantScoped for TenantArgs {
    fn tenant_id(&self) -> Option<TenantId> {
        Some(self.tenant.id)
    }
}

impl TenantScoped for MemberArgs {
    fn tenant_id(&self) -> Option<TenantId> {
        Some(self.member.tenant_id)
    }
}

impl TenantScoped for MemberUpdateArgs {
    fn tenant_id(&self) -> Option<TenantId> {
        Some(self.new_member.tenant_id)
    }
}

impl TenantScoped for MessageArgs {
    fn tenant_id(&self) -> Option<TenantId> {
        self.message.tenant_id
    }
}

impl TenantScoped for MessageUpdateArgs {
    fn tenant_id(&self) -> Option<TenantId> {
        self.new_message.tenant_id
    }
}

impl TenantScoped for ReactionArgs {
    fn tenant_id(&self) -> Option<TenantId> {
        self.reaction.tenant_id
    }
}

impl TenantScoped for Typing {
    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }
}
