//! Invitation actions outside the plain REST surface.

use axum::{extract::State, Json};
use serde_json::Value;
use vortex_core::types::{InternalInvitationSync, SyncAction};

use crate::authz::{Operation, Resource};
use crate::config::GatewayState;
use crate::dtos::SyncInternalInvitationRequest;
use crate::error::AppError;
use crate::middleware::RequestContext;
use crate::utils::validation::{AppJson, FieldErrors};

/// POST /invitation-actions/sync-internal-invitation
///
/// The host application resolved an invitation in its own store and reports
/// the outcome so Vortex's copy matches.
#[tracing::instrument(skip_all, fields(operation = "sync_internal_invitation"))]
pub async fn sync_internal_invitation(
    State(state): State<GatewayState>,
    context: RequestContext,
    AppJson(body): AppJson<SyncInternalInvitationRequest>,
) -> Result<Json<Value>, AppError> {
    let mut fields = FieldErrors::new();
    let creator_id = fields.require("creatorId", body.creator_id.as_deref());
    let target_value = fields.require("targetValue", body.target_value.as_deref());
    let action_raw = fields.require("action", body.action.as_deref());
    let component_id = fields.require("componentId", body.component_id.as_deref());
    fields.check()?;

    let (Some(creator_id), Some(target_value), Some(action_raw), Some(component_id)) =
        (creator_id, target_value, action_raw, component_id)
    else {
        return Err(AppError::Validation(
            "Missing required fields: creatorId, targetValue, action, componentId".to_string(),
        ));
    };

    let action = SyncAction::parse(&action_raw).ok_or_else(|| {
        AppError::Validation(format!(
            "action must be one of: {}",
            SyncAction::ALLOWED.join(", ")
        ))
    })?;

    let sync = InternalInvitationSync {
        creator_id,
        target_value,
        action,
        component_id,
    };

    let gateway = state.gateway().await?;
    let resource = Resource::InternalSync(sync.clone());
    gateway
        .authorize(Operation::SyncInternalInvitation, &context, &resource)
        .await?;

    let result = gateway.client().sync_internal_invitation(&sync).await?;
    tracing::info!(action = sync.action.as_str(), "Internal invitation synced");
    Ok(Json(result))
}
