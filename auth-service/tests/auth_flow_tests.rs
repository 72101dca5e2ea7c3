mod common;

use auth::TokenKind;
use common::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_register_login_and_access_protected_route() {
    let app = TestApp::spawn().await;
    let user_id = app.register("alice@example.com", "correcthorse").await;

    let token = app.access_token("alice@example.com", "correcthorse").await;

    let response = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"][0]["id"], user_id.as_str());
    assert_eq!(body["data"][0]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_registration_sends_verification_token() {
    let app = TestApp::spawn().await;
    let user_id = app.register("alice@example.com", "correcthorse").await;

    let notification = app.verification_for("alice@example.com").await;
    assert_eq!(notification.user_id, user_id);

    let claims = app
        .authenticator
        .validate_token(&notification.token)
        .expect("Verification token did not verify");
    assert_eq!(claims.kind, TokenKind::EmailVerification);
    assert_eq!(claims.subject(), Some(user_id.as_str()));
}

#[tokio::test]
async fn test_verify_email_activates_user() {
    let app = TestApp::spawn().await;
    let user_id = app.register("alice@example.com", "correcthorse").await;
    let notification = app.verification_for("alice@example.com").await;

    let response = app
        .get(&format!("/users/verify?token={}", notification.token))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["is_active"], true);

    let response = app
        .get(&format!("/users/{}", user_id))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["is_active"], true);
}

#[tokio::test]
async fn test_access_token_cannot_verify_email() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", "correcthorse").await;
    let token = app.access_token("alice@example.com", "correcthorse").await;

    let response = app
        .get(&format!("/users/verify?token={}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verification_token_cannot_authorize_requests() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", "correcthorse").await;
    let notification = app.verification_for("alice@example.com").await;

    let response = app
        .get_authenticated("/users", &notification.token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::spawn().await;
    let user_id = app.register("alice@example.com", "correcthorse").await;

    let forged = auth::Authenticator::new(b"another-secret-key-that-is-long-enough!!", "HS256")
        .unwrap()
        .issue_token(&user_id, "admin", TokenKind::Access, chrono::Duration::hours(1))
        .unwrap();

    let response = app
        .get_authenticated("/users", &forged)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::spawn().await;
    let user_id = app.register("alice@example.com", "correcthorse").await;

    let expired = app
        .authenticator
        .issue_token(&user_id, "user", TokenKind::Access, chrono::Duration::zero())
        .unwrap();

    let response = app
        .get_authenticated("/users", &expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
