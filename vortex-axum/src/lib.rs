//! Mountable axum routes for the Vortex invitation/JWT service.
//!
//! The host application supplies a [`GatewayState`] (API key or client
//! override, an identity resolver, and per-operation authorization hooks) and
//! nests [`build_router`] wherever it wants the surface to live:
//!
//! ```ignore
//! let state = GatewayState::eager(
//!     VortexConfig::new()
//!         .with_settings(VortexSettings::new(base_url, api_key))
//!         .with_identity_resolver(identity_resolver(my_resolver))
//!         .with_access_policy(policy),
//! )?;
//! let app = Router::new().nest("/vortex", vortex_axum::build_router(state));
//! ```

pub mod authz;
pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use authz::{predicate, AccessPolicy, AuthzRequest, Operation, Resource};
pub use config::{identity_resolver, GatewayState, IdentityResolver, VortexConfig};
pub use error::AppError;
pub use middleware::RequestContext;
pub use vortex_core::{types, ClientError, HttpVortexClient, VortexClient, VortexSettings};

/// Assemble the invitation/JWT routes around `state`. Mountable under any
/// prefix via `Router::nest`.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/jwt",
            post(handlers::jwt::issue_jwt).fallback(method_not_allowed),
        )
        .route(
            "/invitations",
            get(handlers::invitations::get_invitations_by_target).fallback(method_not_allowed),
        )
        .route(
            "/invitations/accept",
            post(handlers::invitations::accept_invitations).fallback(method_not_allowed),
        )
        .route(
            "/invitations/:id",
            get(handlers::invitations::get_invitation)
                .delete(handlers::invitations::revoke_invitation)
                .fallback(method_not_allowed),
        )
        .route(
            "/invitations/:id/reinvite",
            post(handlers::invitations::reinvite_invitation).fallback(method_not_allowed),
        )
        .route(
            "/invitations/by-group/:group_type/:group_id",
            get(handlers::invitations::get_invitations_by_group)
                .delete(handlers::invitations::delete_invitations_by_group)
                .fallback(method_not_allowed),
        )
        .route(
            "/invitation-actions/sync-internal-invitation",
            post(handlers::actions::sync_internal_invitation).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(middleware::request_id::REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_id::request_id_middleware,
        ))
}

/// Matched path, wrong method.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::NotFound
}
