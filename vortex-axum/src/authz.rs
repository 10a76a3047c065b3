//! The access decision gate.
//!
//! Every invitation operation passes through [`AccessPolicy::authorize`]
//! before the Vortex client is touched. A host-configured predicate, when
//! present for the operation, decides verbatim; otherwise the fallback is
//! "authenticated identity required". Denials never reach the delegate.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use vortex_core::types::{ContactTarget, GroupRef, Identity, InternalInvitationSync};

use crate::error::AppError;
use crate::middleware::RequestContext;

/// The gated operations. Each has its own hook key; structurally similar
/// operations (group get vs. group delete) stay independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetInvitations,
    GetInvitation,
    RevokeInvitation,
    AcceptInvitations,
    GetInvitationsByGroup,
    DeleteInvitationsByGroup,
    ReinviteInvitation,
    SyncInternalInvitation,
}

impl Operation {
    /// Name of the `AccessPolicy` field consulted for this operation, used in
    /// denial messages so integrators know which hook to configure.
    pub fn hook_name(&self) -> &'static str {
        match self {
            Operation::GetInvitations => "can_get_invitations",
            Operation::GetInvitation => "can_get_invitation",
            Operation::RevokeInvitation => "can_revoke_invitation",
            Operation::AcceptInvitations => "can_accept_invitations",
            Operation::GetInvitationsByGroup => "can_get_invitations_by_group",
            Operation::DeleteInvitationsByGroup => "can_delete_invitations_by_group",
            Operation::ReinviteInvitation => "can_reinvite_invitation",
            Operation::SyncInternalInvitation => "can_sync_internal_invitation",
        }
    }
}

/// Normalized identifying data for the object an operation acts on,
/// constructed per-request from sanitized input.
#[derive(Debug, Clone)]
pub enum Resource {
    Invitation { id: String },
    Target(ContactTarget),
    Group(GroupRef),
    Batch { ids: Vec<String> },
    InternalSync(InternalInvitationSync),
    None,
}

/// Everything a predicate gets to look at.
#[derive(Debug, Clone)]
pub struct AuthzRequest {
    pub request: RequestContext,
    pub identity: Option<Identity>,
    pub resource: Resource,
}

pub type AuthzPredicate = Arc<dyn Fn(AuthzRequest) -> BoxFuture<'static, bool> + Send + Sync>;

/// Wrap a plain async closure into an [`AuthzPredicate`].
///
/// ```ignore
/// policy.can_revoke_invitation = Some(predicate(|req: AuthzRequest| async move {
///     req.identity.map(|id| id.admin_scopes.contains(&"invitations".into())).unwrap_or(false)
/// }));
/// ```
pub fn predicate<F, Fut>(f: F) -> AuthzPredicate
where
    F: Fn(AuthzRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    Arc::new(move |request| Box::pin(f(request)))
}

/// Per-operation authorization hooks. Every field is optional; an
/// unconfigured operation falls back to requiring a resolved identity.
#[derive(Clone, Default)]
pub struct AccessPolicy {
    pub can_get_invitations: Option<AuthzPredicate>,
    pub can_get_invitation: Option<AuthzPredicate>,
    pub can_revoke_invitation: Option<AuthzPredicate>,
    pub can_accept_invitations: Option<AuthzPredicate>,
    pub can_get_invitations_by_group: Option<AuthzPredicate>,
    pub can_delete_invitations_by_group: Option<AuthzPredicate>,
    pub can_reinvite_invitation: Option<AuthzPredicate>,
    pub can_sync_internal_invitation: Option<AuthzPredicate>,
}

impl AccessPolicy {
    fn hook(&self, operation: Operation) -> Option<&AuthzPredicate> {
        match operation {
            Operation::GetInvitations => self.can_get_invitations.as_ref(),
            Operation::GetInvitation => self.can_get_invitation.as_ref(),
            Operation::RevokeInvitation => self.can_revoke_invitation.as_ref(),
            Operation::AcceptInvitations => self.can_accept_invitations.as_ref(),
            Operation::GetInvitationsByGroup => self.can_get_invitations_by_group.as_ref(),
            Operation::DeleteInvitationsByGroup => self.can_delete_invitations_by_group.as_ref(),
            Operation::ReinviteInvitation => self.can_reinvite_invitation.as_ref(),
            Operation::SyncInternalInvitation => self.can_sync_internal_invitation.as_ref(),
        }
    }

    /// Evaluate the gate for one operation. The predicate's boolean is the
    /// decision verbatim, identity present or not; without a predicate the
    /// decision is `identity.is_some()`.
    pub async fn authorize(
        &self,
        operation: Operation,
        request: &RequestContext,
        identity: Option<&Identity>,
        resource: &Resource,
    ) -> Result<(), AppError> {
        let allowed = match self.hook(operation) {
            Some(check) => {
                check(AuthzRequest {
                    request: request.clone(),
                    identity: identity.cloned(),
                    resource: resource.clone(),
                })
                .await
            }
            None => identity.is_some(),
        };

        if allowed {
            Ok(())
        } else {
            tracing::warn!(
                operation = operation.hook_name(),
                authenticated = identity.is_some(),
                "Access denied"
            );
            Err(AppError::Forbidden {
                hook: operation.hook_name(),
            })
        }
    }
}
