//! Revocation, store outages, and concurrency through the router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use gabb_auth::testing::{TestAuth, sign_with_foreign_key};
use gabb_auth::{Claims, TokenPurpose};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_operator_revocation_and_restore() {
    let app = TestApp::new();
    let id = app.persons.add("cy@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ValidateEmail).await;

    app.auth.authorizer.revoke(&token).await.unwrap();
    let (status, _) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.auth.authorizer.restore(&token).await.unwrap();
    let (status, _) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_foreign_signature_refused() {
    let app = TestApp::new();
    let id = app.persons.add("cy@example.com");
    let claims = Claims::new(Some(id.clone()), "validate-email", i64::MAX);
    let token = sign_with_foreign_key(&claims).await;

    let (status, _) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revocation_store_outage_is_503() {
    let app = TestApp::with_auth(TestAuth::with_failing_store());
    let id = app.persons.add("cy@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ValidateEmail).await;

    let (status, body) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].is_string());
    assert!(!app.persons.get(&id).unwrap().email_address_validated);
}

#[tokio::test]
async fn test_directory_outage_keeps_token_usable() {
    let app = TestApp::new();
    let id = app.persons.add("cy@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ResetPassword).await;
    let body = json!({"password": "n3w-secret"}).to_string();

    app.persons.set_unavailable(true);
    let (status, json) = app.post("/reset_password", Some(&token), &body).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["message"], "Service temporarily unavailable");

    let decision = app
        .auth
        .authorizer
        .authorize(Some(&token), gabb_auth::scope::RESET_PASSWORD)
        .await
        .unwrap();
    assert!(decision.is_allowed());

    app.persons.set_unavailable(false);
    let (status, _) = app.post("/reset_password", Some(&token), &body).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.password_matches(&id, "n3w-secret"));

    let (status, _) = app.post("/reset_password", Some(&token), &body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resets_consume_once() {
    let app = Arc::new(TestApp::new());
    let id = app.persons.add("dee@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ResetPassword).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let body = json!({ "password": format!("pw-{i}") }).to_string();
            app.post("/reset_password", Some(&token), &body).await.0
        }));
    }

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::NO_CONTENT => ok += 1,
            StatusCode::UNAUTHORIZED => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
}

#[tokio::test]
async fn test_preflight_allows_any_origin() {
    let app = TestApp::new();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/reset_password")
        .header("origin", "https://gabb.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), req)
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
