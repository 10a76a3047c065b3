mod common;

use axum::http::StatusCode;
use common::{
    delete, get, post_empty, send, state_with, test_identity, RecordedCall, RecordingClient,
};
use serde_json::json;
use vortex_axum::types::{ContactTarget, TargetKind};
use vortex_axum::{predicate, AccessPolicy};

#[tokio::test]
async fn get_by_target_passes_the_delegate_response_through() {
    let client = RecordingClient::with_response(json!({"invitations": [{"id": "i1"}]}));
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, body) = send(
        state,
        get("/invitations?targetType=email&targetValue=a@b.com"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"invitations": [{"id": "i1"}]}));
    assert_eq!(
        client.calls(),
        vec![RecordedCall::GetByTarget(ContactTarget {
            kind: TargetKind::Email,
            value: "a@b.com".to_string(),
        })]
    );
}

#[tokio::test]
async fn get_by_target_rejects_unknown_kind() {
    let client = RecordingClient::new();
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, body) = send(
        state,
        get("/invitations?targetType=carrier-pigeon&targetValue=x"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "targetType must be one of: email, username, phoneNumber"
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn get_by_target_lists_every_missing_field() {
    let client = RecordingClient::new();
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, body) = send(state, get("/invitations")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: targetType, targetValue");
}

#[tokio::test]
async fn no_identity_and_no_hook_is_denied() {
    let client = RecordingClient::new();
    let state = state_with(client.clone(), None, AccessPolicy::default());

    let (status, body) = send(
        state,
        get("/invitations?targetType=email&targetValue=a@b.com"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "access_denied");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("can_get_invitations"), "got: {}", message);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn denying_hook_never_reaches_the_delegate() {
    let client = RecordingClient::new();
    let mut access = AccessPolicy::default();
    access.can_get_invitation = Some(predicate(|_| async { false }));
    let state = state_with(client.clone(), Some(test_identity()), access);

    let (status, _) = send(state, get("/invitations/i1")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn hook_may_allow_anonymous_access() {
    let client = RecordingClient::new();
    let mut access = AccessPolicy::default();
    access.can_get_invitation = Some(predicate(|_| async { true }));
    let state = state_with(client.clone(), None, access);

    let (status, _) = send(state, get("/invitations/i1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(client.calls(), vec![RecordedCall::GetById("i1".to_string())]);
}

#[tokio::test]
async fn get_revoke_and_reinvite_dispatch_to_distinct_methods() {
    let client = RecordingClient::new();
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, _) = send(state.clone(), get("/invitations/i1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(state.clone(), delete("/invitations/i1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(state, post_empty("/invitations/i1/reinvite")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        client.calls(),
        vec![
            RecordedCall::GetById("i1".to_string()),
            RecordedCall::Revoke("i1".to_string()),
            RecordedCall::Reinvite("i1".to_string()),
        ]
    );
}

#[tokio::test]
async fn path_ids_are_sanitized_before_dispatch() {
    let client = RecordingClient::new();
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, _) = send(state, get("/invitations/%20i1%20")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(client.calls(), vec![RecordedCall::GetById("i1".to_string())]);
}

#[tokio::test]
async fn wrong_method_on_collection_is_405() {
    let client = RecordingClient::new();
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, body) = send(state, delete("/invitations")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "Method not allowed"}));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn unknown_path_is_404_with_json_envelope() {
    let client = RecordingClient::new();
    let state = state_with(client, Some(test_identity()), AccessPolicy::default());

    let (status, body) = send(state, get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn upstream_fault_is_surfaced_in_the_envelope() {
    let client = RecordingClient::failing(409, "Invitation already accepted");
    let state = state_with(client.clone(), Some(test_identity()), AccessPolicy::default());

    let (status, body) = send(state, get("/invitations/i1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Invitation already accepted");
    assert_eq!(body["code"], "upstream_error");
    assert_eq!(client.calls().len(), 1);
}
