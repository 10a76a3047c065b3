use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use vortex_core::ClientError;

use crate::dtos::ErrorResponse;

/// Faults a request can end with, one variant per taxonomy entry.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("access denied for {hook}")]
    Forbidden { hook: &'static str },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("not found")]
    NotFound,

    #[error("configuration error: {0}")]
    Config(anyhow::Error),

    #[error("Vortex client error: {0}")]
    Client(#[from] ClientError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, message, Some("validation_failed"))
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized".to_string(),
                Some("unauthenticated"),
            ),
            AppError::Forbidden { hook } => (
                StatusCode::FORBIDDEN,
                format!(
                    "Access denied. Configure the `{}` hook on AccessPolicy to authorize this operation.",
                    hook
                ),
                Some("access_denied"),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
                None,
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string(), None),
            AppError::Config(err) => {
                tracing::error!(error = %err, "Vortex gateway misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Configuration error: {}", err),
                    Some("configuration_error"),
                )
            }
            AppError::Client(err) => {
                // The upstream message is surfaced as-is; the full fault goes
                // to the operator log.
                tracing::error!(error = ?err, "Vortex client call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.to_string(),
                    Some("upstream_error"),
                )
            }
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}
