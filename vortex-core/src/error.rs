use thiserror::Error;

/// Faults raised while talking to the Vortex service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to Vortex failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Vortex answered with a non-success status. The upstream message is
    /// carried verbatim so callers can surface it.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("failed to decode Vortex response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Vortex response missing expected field `{0}`")]
    MalformedResponse(&'static str),
}

impl ClientError {
    /// HTTP status reported by Vortex, if this fault came from a response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClientError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
