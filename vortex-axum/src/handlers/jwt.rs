//! JWT issuance.
//!
//! The one operation with no resource descriptor and no access-gate stage:
//! a configured identity resolver stands in for authorization. A missing
//! resolver, or a resolved identity without the minimum claims, is the
//! integrator's fault and reports as a configuration error rather than as a
//! caller failure.

use axum::{extract::State, Json};
use vortex_core::types::JwtRequest;

use crate::config::GatewayState;
use crate::dtos::JwtResponse;
use crate::error::AppError;
use crate::middleware::RequestContext;

#[tracing::instrument(skip_all)]
pub async fn issue_jwt(
    State(state): State<GatewayState>,
    context: RequestContext,
) -> Result<Json<JwtResponse>, AppError> {
    let gateway = state.gateway().await?;

    let resolver = gateway.identity_resolver().ok_or_else(|| {
        AppError::Config(anyhow::anyhow!(
            "no identity resolver configured; set VortexConfig::identity to issue JWTs"
        ))
    })?;

    let identity = resolver
        .resolve(&context)
        .await
        .ok_or(AppError::Unauthorized)?;

    // An identity without the minimum claims means the authentication hook is
    // broken, not that the caller is unauthorized.
    if identity.user_id.trim().is_empty() || identity.email.trim().is_empty() {
        return Err(AppError::Config(anyhow::anyhow!(
            "identity resolver returned an identity without a user id or email"
        )));
    }

    let request = JwtRequest {
        user_id: identity.user_id,
        user_email: identity.email,
        display_name: identity.display_name.filter(|v| !v.is_empty()),
        avatar_url: identity.avatar_url.filter(|v| !v.is_empty()),
        admin_scopes: identity.admin_scopes,
        allowed_email_domains: identity.allowed_email_domains,
    };

    let jwt = gateway.client().issue_jwt(&request).await?;

    tracing::debug!(user_id = %request.user_id, "JWT issued");

    Ok(Json(JwtResponse { jwt }))
}
