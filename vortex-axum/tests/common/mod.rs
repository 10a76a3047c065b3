//! Shared harness for the gateway integration tests.
//!
//! Routes are driven through `tower::ServiceExt::oneshot`; the Vortex client
//! is a recording mock so tests can assert exactly which delegate calls were
//! (or were not) made.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use vortex_axum::types::{
    Acceptor, ContactTarget, GroupRef, Identity, InternalInvitationSync, JwtRequest,
};
use vortex_axum::{
    build_router, identity_resolver, AccessPolicy, ClientError, GatewayState, VortexClient,
    VortexConfig,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    GetByTarget(ContactTarget),
    GetById(String),
    Revoke(String),
    Accept {
        ids: Vec<String>,
        acceptor: Acceptor,
    },
    GetByGroup(GroupRef),
    DeleteByGroup(GroupRef),
    Reinvite(String),
    Sync(InternalInvitationSync),
    IssueJwt(JwtRequest),
}

/// Mock delegate: records every call and answers with a canned payload, or
/// with a configured upstream fault.
pub struct RecordingClient {
    calls: Mutex<Vec<RecordedCall>>,
    response: Value,
    jwt: String,
    upstream_failure: Option<(u16, String)>,
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: json!({"ok": true}),
            jwt: "test-token".to_string(),
            upstream_failure: None,
        }
    }
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_response(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response,
            ..Default::default()
        })
    }

    pub fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            upstream_failure: Some((status, message.to_string())),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> Result<Value, ClientError> {
        self.calls.lock().unwrap().push(call);
        if let Some((status, message)) = &self.upstream_failure {
            return Err(ClientError::Upstream {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self.response.clone())
    }
}

#[async_trait]
impl VortexClient for RecordingClient {
    async fn get_invitations_by_target(
        &self,
        target: &ContactTarget,
    ) -> Result<Value, ClientError> {
        self.record(RecordedCall::GetByTarget(target.clone()))
    }

    async fn get_invitation(&self, invitation_id: &str) -> Result<Value, ClientError> {
        self.record(RecordedCall::GetById(invitation_id.to_string()))
    }

    async fn revoke_invitation(&self, invitation_id: &str) -> Result<Value, ClientError> {
        self.record(RecordedCall::Revoke(invitation_id.to_string()))
    }

    async fn accept_invitations(
        &self,
        invitation_ids: &[String],
        acceptor: &Acceptor,
    ) -> Result<Value, ClientError> {
        self.record(RecordedCall::Accept {
            ids: invitation_ids.to_vec(),
            acceptor: acceptor.clone(),
        })
    }

    async fn get_invitations_by_group(&self, group: &GroupRef) -> Result<Value, ClientError> {
        self.record(RecordedCall::GetByGroup(group.clone()))
    }

    async fn delete_invitations_by_group(
        &self,
        group: &GroupRef,
    ) -> Result<Value, ClientError> {
        self.record(RecordedCall::DeleteByGroup(group.clone()))
    }

    async fn reinvite(&self, invitation_id: &str) -> Result<Value, ClientError> {
        self.record(RecordedCall::Reinvite(invitation_id.to_string()))
    }

    async fn sync_internal_invitation(
        &self,
        sync: &InternalInvitationSync,
    ) -> Result<Value, ClientError> {
        self.record(RecordedCall::Sync(sync.clone()))
    }

    async fn issue_jwt(&self, request: &JwtRequest) -> Result<String, ClientError> {
        self.record(RecordedCall::IssueJwt(request.clone()))?;
        Ok(self.jwt.clone())
    }
}

pub fn test_identity() -> Identity {
    Identity {
        user_id: "u1".to_string(),
        email: "a@b.com".to_string(),
        ..Default::default()
    }
}

/// Eager state with a mock client, a resolver answering `resolved`, and the
/// given policy.
pub fn state_with(
    client: Arc<RecordingClient>,
    resolved: Option<Identity>,
    access: AccessPolicy,
) -> GatewayState {
    GatewayState::eager(
        VortexConfig::new()
            .with_client(client)
            .with_identity_resolver(identity_resolver(move |_| {
                let resolved = resolved.clone();
                async move { resolved }
            }))
            .with_access_policy(access),
    )
    .expect("eager state")
}

/// Eager state with no identity resolver configured at all.
pub fn state_without_resolver(client: Arc<RecordingClient>) -> GatewayState {
    GatewayState::eager(VortexConfig::new().with_client(client)).expect("eager state")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Drive one request through a fresh copy of the router and decode the JSON
/// body (Null when empty).
pub async fn send(state: GatewayState, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(request)
        .await
        .expect("router never fails");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}
