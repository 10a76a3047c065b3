//! Raw wire shapes for the mounted routes.
//!
//! Inbound DTOs keep every field optional so the normalizer can report all
//! missing fields together instead of failing on the first serde error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetQuery {
    pub target_type: Option<String>,
    pub target_value: Option<String>,
}

/// Accept-invitation body. Both payload generations are carried: the legacy
/// `target` descriptor and the richer `user` object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationsRequest {
    #[serde(default)]
    pub invitation_ids: Vec<String>,
    pub target: Option<RawTarget>,
    pub user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
pub struct RawTarget {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncInternalInvitationRequest {
    pub creator_id: Option<String>,
    pub target_value: Option<String>,
    pub action: Option<String>,
    pub component_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JwtResponse {
    pub jwt: String,
}

/// Uniform error envelope for every failure path.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}
