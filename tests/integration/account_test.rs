//! Email validation and password reset over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use gabb_auth::testing::NOW;
use gabb_auth::{PrincipalType, TokenPurpose};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_validate_email_once() {
    let app = TestApp::new();
    let id = app.persons.add("ana@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ValidateEmail).await;

    let (status, body) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);
    assert!(app.persons.get(&id).unwrap().email_address_validated);

    let (status, body) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_validate_email_without_token() {
    let app = TestApp::new();
    let (status, _) = app.post("/validate_email", None, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validate_email_unknown_person() {
    let app = TestApp::new();
    let token = app
        .single_purpose_token("7e0f1c52-0000-4000-8000-000000000000", TokenPurpose::ValidateEmail)
        .await;
    let (status, _) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_email_expired() {
    let app = TestApp::new();
    let id = app.persons.add("ana@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ValidateEmail).await;
    app.auth.clock.set(NOW + 24 * 60 * 60);

    let (status, _) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!app.persons.get(&id).unwrap().email_address_validated);
}

#[tokio::test]
async fn test_person_token_cannot_validate_email() {
    let app = TestApp::new();
    let id = app.persons.add("ana@example.com");
    let token = app.auth.issuer.issue_for_person(&id).await.unwrap().token;

    let (status, _) = app.post("/validate_email", Some(&token), "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_password() {
    let app = TestApp::new();
    let id = app.persons.add("ben@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ResetPassword).await;
    let body = json!({ "password": "n3w-passw0rd" }).to_string();

    let (status, _) = app.post("/reset_password", Some(&token), &body).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.password_matches(&id, "n3w-passw0rd"));

    let again = json!({ "password": "another" }).to_string();
    let (status, _) = app.post("/reset_password", Some(&token), &again).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.password_matches(&id, "n3w-passw0rd"));
}

#[tokio::test]
async fn test_reset_password_malformed_json() {
    let app = TestApp::new();
    let id = app.persons.add("ben@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ResetPassword).await;

    let (status, body) = app.post("/reset_password", Some(&token), "{\"password\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Malformed JSON" }));

    // The token survives a rejected body.
    let body = json!({ "password": "fine" }).to_string();
    let (status, _) = app.post("/reset_password", Some(&token), &body).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_reset_password_missing_password() {
    let app = TestApp::new();
    let id = app.persons.add("ben@example.com");
    let token = app.single_purpose_token(&id, TokenPurpose::ResetPassword).await;

    let (status, _) = app.post("/reset_password", Some(&token), "{}").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.persons.get(&id).unwrap().hashed_password.is_none());
}

#[tokio::test]
async fn test_reset_password_refuses_bad_token_before_password_check() {
    let app = TestApp::new();
    let (status, _) = app.post("/reset_password", Some("garbage"), "{}").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_app_token_cannot_reset_password() {
    let app = TestApp::new();
    let token = app
        .auth
        .issuer
        .issue_for_principal_type(PrincipalType::App)
        .await
        .unwrap()
        .token;
    let body = json!({ "password": "x" }).to_string();

    let (status, _) = app.post("/reset_password", Some(&token), &body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
