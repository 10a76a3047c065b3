//! The delegate seam to the Vortex service.
//!
//! `VortexClient` is the interface the gateway dispatches through; the
//! reqwest-backed `HttpVortexClient` is the default implementation, keyed by
//! an API key. Hosts (and tests) may substitute their own implementation.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{
    Acceptor, ContactTarget, GroupRef, InternalInvitationSync, JwtRequest,
};

pub const API_KEY_HEADER: &str = "x-vortex-api-key";

const DEFAULT_BASE_URL: &str = "https://api.vortexhq.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Everything the gateway performs against Vortex goes through exactly one of
/// these methods, with already-sanitized arguments, awaited within the
/// request that triggered it.
#[async_trait]
pub trait VortexClient: Send + Sync {
    async fn get_invitations_by_target(&self, target: &ContactTarget)
        -> Result<Value, ClientError>;

    async fn get_invitation(&self, invitation_id: &str) -> Result<Value, ClientError>;

    async fn revoke_invitation(&self, invitation_id: &str) -> Result<Value, ClientError>;

    async fn accept_invitations(
        &self,
        invitation_ids: &[String],
        acceptor: &Acceptor,
    ) -> Result<Value, ClientError>;

    async fn get_invitations_by_group(&self, group: &GroupRef) -> Result<Value, ClientError>;

    async fn delete_invitations_by_group(&self, group: &GroupRef)
        -> Result<Value, ClientError>;

    async fn reinvite(&self, invitation_id: &str) -> Result<Value, ClientError>;

    async fn sync_internal_invitation(
        &self,
        sync: &InternalInvitationSync,
    ) -> Result<Value, ClientError>;

    async fn issue_jwt(&self, request: &JwtRequest) -> Result<String, ClientError>;
}

/// Connection settings for the hosted Vortex API.
#[derive(Debug, Clone)]
pub struct VortexSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    pub timeout_seconds: u64,
}

impl VortexSettings {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Secret::new(api_key.into()),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Load settings from the environment. `VORTEX_API_KEY` is always
    /// required; the base URL and timeout fall back to defaults outside
    /// production (`ENVIRONMENT=prod`).
    pub fn from_env() -> anyhow::Result<Self> {
        let is_prod = env::var("ENVIRONMENT")
            .map(|v| v.eq_ignore_ascii_case("prod"))
            .unwrap_or(false);

        let settings = Self {
            base_url: get_env("VORTEX_BASE_URL", Some(DEFAULT_BASE_URL), is_prod)?,
            api_key: Secret::new(get_env("VORTEX_API_KEY", None, is_prod)?),
            timeout_seconds: get_env(
                "VORTEX_TIMEOUT_SECONDS",
                Some(&DEFAULT_TIMEOUT_SECONDS.to_string()),
                is_prod,
            )?
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                anyhow::anyhow!("VORTEX_TIMEOUT_SECONDS must be an integer: {}", e)
            })?,
        };

        if settings.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("VORTEX_API_KEY must not be empty");
        }

        Ok(settings)
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> anyhow::Result<String> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if let Some(def) = default.filter(|_| !is_prod) {
                Ok(def.to_string())
            } else {
                anyhow::bail!("{} is required but not set", key)
            }
        }
    }
}

/// Default `VortexClient` over the hosted HTTP API.
pub struct HttpVortexClient {
    http: reqwest::Client,
    settings: VortexSettings,
}

impl HttpVortexClient {
    pub fn new(settings: VortexSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { http, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(API_KEY_HEADER, self.settings.api_key.expose_secret())
    }

    /// Send a prepared request and decode the JSON body, mapping non-success
    /// statuses to `ClientError::Upstream` with the upstream message.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(ClientError::Decode);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("Vortex returned status {}", status.as_u16())
                } else {
                    body
                }
            });

        Err(ClientError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl VortexClient for HttpVortexClient {
    async fn get_invitations_by_target(
        &self,
        target: &ContactTarget,
    ) -> Result<Value, ClientError> {
        let request = self.request(reqwest::Method::GET, "/v1/invitations").query(&[
            ("targetType", target.kind.as_str()),
            ("targetValue", target.value.as_str()),
        ]);
        self.execute(request).await
    }

    async fn get_invitation(&self, invitation_id: &str) -> Result<Value, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/invitations/{}", invitation_id),
        );
        self.execute(request).await
    }

    async fn revoke_invitation(&self, invitation_id: &str) -> Result<Value, ClientError> {
        let request = self.request(
            reqwest::Method::DELETE,
            &format!("/v1/invitations/{}", invitation_id),
        );
        self.execute(request).await
    }

    async fn accept_invitations(
        &self,
        invitation_ids: &[String],
        acceptor: &Acceptor,
    ) -> Result<Value, ClientError> {
        let body = match acceptor {
            Acceptor::Target(target) => serde_json::json!({
                "invitationIds": invitation_ids,
                "target": target,
            }),
            Acceptor::User(user) => serde_json::json!({
                "invitationIds": invitation_ids,
                "user": user,
            }),
        };
        let request = self
            .request(reqwest::Method::POST, "/v1/invitations/accept")
            .json(&body);
        self.execute(request).await
    }

    async fn get_invitations_by_group(&self, group: &GroupRef) -> Result<Value, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/groups/{}/{}/invitations", group.group_type, group.id),
        );
        self.execute(request).await
    }

    async fn delete_invitations_by_group(
        &self,
        group: &GroupRef,
    ) -> Result<Value, ClientError> {
        let request = self.request(
            reqwest::Method::DELETE,
            &format!("/v1/groups/{}/{}/invitations", group.group_type, group.id),
        );
        self.execute(request).await
    }

    async fn reinvite(&self, invitation_id: &str) -> Result<Value, ClientError> {
        let request = self.request(
            reqwest::Method::POST,
            &format!("/v1/invitations/{}/reinvite", invitation_id),
        );
        self.execute(request).await
    }

    async fn sync_internal_invitation(
        &self,
        sync: &InternalInvitationSync,
    ) -> Result<Value, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/invitation-actions/sync")
            .json(sync);
        self.execute(request).await
    }

    async fn issue_jwt(&self, request: &JwtRequest) -> Result<String, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/jwt")
            .json(request);
        let body = self.execute(request).await?;

        body.get("jwt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ClientError::MalformedResponse("jwt"))
    }
}
