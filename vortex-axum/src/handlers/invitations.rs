//! Invitation route handlers.
//!
//! Every handler is the same pipeline instantiated for one operation:
//! sanitize input into a resource descriptor, resolve the identity, evaluate
//! the access gate, call the one matching Vortex client method, and pass its
//! JSON through.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use vortex_core::types::{AcceptingUser, Acceptor, ContactTarget, GroupRef, TargetKind};

use crate::authz::{Operation, Resource};
use crate::config::GatewayState;
use crate::dtos::{AcceptInvitationsRequest, RawTarget, RawUser, TargetQuery};
use crate::error::AppError;
use crate::middleware::RequestContext;
use crate::utils::validation::{sanitize, sanitize_batch, AppJson, FieldErrors};

/// GET /invitations?targetType=..&targetValue=..
#[tracing::instrument(skip_all, fields(operation = "get_invitations"))]
pub async fn get_invitations_by_target(
    State(state): State<GatewayState>,
    context: RequestContext,
    Query(query): Query<TargetQuery>,
) -> Result<Json<Value>, AppError> {
    let target = parse_target_query(&query)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Target(target.clone());
    gateway
        .authorize(Operation::GetInvitations, &context, &resource)
        .await?;

    let invitations = gateway.client().get_invitations_by_target(&target).await?;
    Ok(Json(invitations))
}

/// GET /invitations/:id
#[tracing::instrument(skip_all, fields(operation = "get_invitation"))]
pub async fn get_invitation(
    State(state): State<GatewayState>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(&id)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Invitation { id: id.clone() };
    gateway
        .authorize(Operation::GetInvitation, &context, &resource)
        .await?;

    let invitation = gateway.client().get_invitation(&id).await?;
    Ok(Json(invitation))
}

/// DELETE /invitations/:id
#[tracing::instrument(skip_all, fields(operation = "revoke_invitation"))]
pub async fn revoke_invitation(
    State(state): State<GatewayState>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(&id)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Invitation { id: id.clone() };
    gateway
        .authorize(Operation::RevokeInvitation, &context, &resource)
        .await?;

    let revoked = gateway.client().revoke_invitation(&id).await?;
    tracing::info!(invitation_id = %id, "Invitation revoked");
    Ok(Json(revoked))
}

/// POST /invitations/accept
#[tracing::instrument(skip_all, fields(operation = "accept_invitations"))]
pub async fn accept_invitations(
    State(state): State<GatewayState>,
    context: RequestContext,
    AppJson(body): AppJson<AcceptInvitationsRequest>,
) -> Result<Json<Value>, AppError> {
    let ids = sanitize_batch(&body.invitation_ids, "invitationIds")?;
    let acceptor = parse_acceptor(body.user, body.target)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Batch { ids: ids.clone() };
    gateway
        .authorize(Operation::AcceptInvitations, &context, &resource)
        .await?;

    let accepted = gateway.client().accept_invitations(&ids, &acceptor).await?;
    tracing::info!(count = ids.len(), "Invitations accepted");
    Ok(Json(accepted))
}

/// GET /invitations/by-group/:group_type/:group_id
#[tracing::instrument(skip_all, fields(operation = "get_invitations_by_group"))]
pub async fn get_invitations_by_group(
    State(state): State<GatewayState>,
    context: RequestContext,
    Path((group_type, group_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let group = parse_group(&group_type, &group_id)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Group(group.clone());
    gateway
        .authorize(Operation::GetInvitationsByGroup, &context, &resource)
        .await?;

    let invitations = gateway.client().get_invitations_by_group(&group).await?;
    Ok(Json(invitations))
}

/// DELETE /invitations/by-group/:group_type/:group_id
#[tracing::instrument(skip_all, fields(operation = "delete_invitations_by_group"))]
pub async fn delete_invitations_by_group(
    State(state): State<GatewayState>,
    context: RequestContext,
    Path((group_type, group_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let group = parse_group(&group_type, &group_id)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Group(group.clone());
    gateway
        .authorize(Operation::DeleteInvitationsByGroup, &context, &resource)
        .await?;

    let deleted = gateway.client().delete_invitations_by_group(&group).await?;
    tracing::info!(group_type = %group.group_type, group_id = %group.id, "Group invitations deleted");
    Ok(Json(deleted))
}

/// POST /invitations/:id/reinvite
#[tracing::instrument(skip_all, fields(operation = "reinvite_invitation"))]
pub async fn reinvite_invitation(
    State(state): State<GatewayState>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(&id)?;

    let gateway = state.gateway().await?;
    let resource = Resource::Invitation { id: id.clone() };
    gateway
        .authorize(Operation::ReinviteInvitation, &context, &resource)
        .await?;

    let reinvited = gateway.client().reinvite(&id).await?;
    tracing::info!(invitation_id = %id, "Invitation resent");
    Ok(Json(reinvited))
}

fn require_id(raw: &str) -> Result<String, AppError> {
    let mut fields = FieldErrors::new();
    let id = fields.require("id", Some(raw));
    fields.check()?;
    id.ok_or_else(|| AppError::Validation("Missing required fields: id".to_string()))
}

fn parse_group(group_type: &str, group_id: &str) -> Result<GroupRef, AppError> {
    let mut fields = FieldErrors::new();
    let group_type = fields.require("groupType", Some(group_type));
    let group_id = fields.require("groupId", Some(group_id));
    fields.check()?;

    let (Some(group_type), Some(id)) = (group_type, group_id) else {
        return Err(AppError::Validation(
            "Missing required fields: groupType, groupId".to_string(),
        ));
    };

    Ok(GroupRef { group_type, id })
}

fn parse_target_query(query: &TargetQuery) -> Result<ContactTarget, AppError> {
    let mut fields = FieldErrors::new();
    let kind_raw = fields.require("targetType", query.target_type.as_deref());
    let value = fields.require("targetValue", query.target_value.as_deref());
    fields.check()?;

    let (Some(kind_raw), Some(value)) = (kind_raw, value) else {
        return Err(AppError::Validation(
            "Missing required fields: targetType, targetValue".to_string(),
        ));
    };

    let kind = TargetKind::parse(&kind_raw).ok_or_else(|| {
        AppError::Validation(format!(
            "targetType must be one of: {}",
            TargetKind::ALLOWED.join(", ")
        ))
    })?;

    Ok(ContactTarget { kind, value })
}

/// Resolve the accept payload union. Both generations are accepted; the
/// richer `user` object wins when both keys are present.
fn parse_acceptor(
    user: Option<RawUser>,
    target: Option<RawTarget>,
) -> Result<Acceptor, AppError> {
    if let Some(user) = user {
        let user = AcceptingUser {
            email: user.email.as_deref().and_then(sanitize),
            phone: user.phone.as_deref().and_then(sanitize),
            name: user.name.as_deref().and_then(sanitize),
        };
        if !user.has_contact() {
            return Err(AppError::Validation(
                "User must include at least one of email or phone".to_string(),
            ));
        }
        return Ok(Acceptor::User(user));
    }

    if let Some(target) = target {
        let mut fields = FieldErrors::new();
        let kind_raw = fields.require("target.type", target.kind.as_deref());
        let value = fields.require("target.value", target.value.as_deref());
        fields.check()?;

        let (Some(kind_raw), Some(value)) = (kind_raw, value) else {
            return Err(AppError::Validation(
                "Missing required fields: target.type, target.value".to_string(),
            ));
        };

        let kind = TargetKind::parse_legacy(&kind_raw).ok_or_else(|| {
            AppError::Validation(format!(
                "target.type must be one of: {}, phone",
                TargetKind::ALLOWED.join(", ")
            ))
        })?;

        return Ok(Acceptor::Target(ContactTarget { kind, value }));
    }

    Err(AppError::Validation(
        "Either user or target must be provided".to_string(),
    ))
}
