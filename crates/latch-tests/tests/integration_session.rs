// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! End-to-end session flows over the router:
//!
//! - `test_login_*`: credential checks and cookie issue
//! - `test_gate_*`: authenticated and admin-only access
//! - `test_logout_*`: cookie clearing and stateless replay

use chrono::Utc;
use latch_api::{Identity, Role, TokenCodec};
use latch_config::SessionConfig;
use latch_tests::common::init_test_logging;
use latch_tests::prelude::*;

const PROTECTED: &str = "/api/v1/users/protected";
const ADMIN: &str = "/api/v1/users";

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_sets_secure_cookie() {
    init_test_logging();
    let app = TestApp::new();
    let mut agent = app.agent();
    agent.register(&UserFixtures::alice()).await.assert_status(200);

    let response = agent
        .login(UserFixtures::ALICE_EMAIL, UserFixtures::PASSWORD)
        .await;

    response.assert_status(200).assert_session_cookie("session");
    assert_eq!(response.body["message"], "Signed in successfully");
    assert_eq!(response.body["user"]["email"], UserFixtures::ALICE_EMAIL);
    assert!(response.set_cookie().unwrap().contains("Max-Age=86400"));
    assert!(agent.session_token().is_some());
}

#[tokio::test]
async fn test_login_cookie_carries_verifiable_token() {
    let app = TestApp::new();
    let agent = app.signed_in(&UserFixtures::alice()).await;

    let claims = app
        .state()
        .codec()
        .verify(agent.session_token().unwrap())
        .unwrap();
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.iss, "latch");
    assert_eq!(claims.exp - claims.iat, 86_400);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    let app = TestApp::new();
    let mut agent = app.agent();
    agent.register(&UserFixtures::alice()).await;

    let wrong_password = agent
        .login(UserFixtures::ALICE_EMAIL, "definitely wrong")
        .await;
    let unknown_email = agent
        .login("nobody@example.com", UserFixtures::PASSWORD)
        .await;

    for response in [&wrong_password, &unknown_email] {
        response.assert_error(401, "INVALID_CREDENTIALS");
        assert_eq!(response.body["error"]["message"], "Invalid email or password");
        assert!(response.set_cookie().is_none());
    }
    assert!(agent.session_token().is_none());
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new();
    let mut agent = app.agent();

    agent.login("", "").await.assert_error(400, "BAD_REQUEST");
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    let mut agent = app.agent();
    agent.register(&UserFixtures::alice()).await;

    agent
        .login("ALICE@Example.com", UserFixtures::PASSWORD)
        .await
        .assert_status(200);
}

// =============================================================================
// Gates
// =============================================================================

#[tokio::test]
async fn test_gate_no_cookie_is_unauthorized() {
    let app = TestApp::new();
    let mut agent = app.agent();

    agent.get(PROTECTED).await.assert_unauthorized();
    agent.get(ADMIN).await.assert_unauthorized();
}

#[tokio::test]
async fn test_gate_user_reaches_protected_resource() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;

    let response = agent.get(PROTECTED).await;
    response.assert_status(200);
    assert_eq!(response.body["email"], UserFixtures::ALICE_EMAIL);
    assert_eq!(response.body["firstName"], "Alice");
}

#[tokio::test]
async fn test_gate_user_denied_admin_resource_with_401() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;

    agent.get(ADMIN).await.assert_unauthorized();
}

#[tokio::test]
async fn test_gate_admin_reaches_both_resources() {
    let app = TestApp::new();
    let mut alice = app.signed_in(&UserFixtures::alice()).await;
    let mut admin = app.signed_in(&UserFixtures::admin()).await;

    admin.get(PROTECTED).await.assert_status(200);

    let listing = admin.get(ADMIN).await;
    listing.assert_status(200);
    assert_eq!(listing.body.as_array().unwrap().len(), 2);

    alice.get(PROTECTED).await.assert_status(200);
}

#[tokio::test]
async fn test_gate_rejects_tampered_cookie() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;

    let token = agent.session_token().unwrap().to_string();
    let mut bytes = token.into_bytes();
    let last = bytes.len() - 1;
    bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
    agent.set_session_token(Some(String::from_utf8(bytes).unwrap()));

    agent.get(PROTECTED).await.assert_unauthorized();
}

#[tokio::test]
async fn test_gate_rejects_forged_admin_token() {
    let app = TestApp::new();
    let mut agent = app.agent();

    let forger = TokenCodec::new(&SessionConfig::with_secret(ConfigFixtures::OTHER_SECRET)).unwrap();
    let forged = forger.issue(&UserFixtures::admin_identity()).unwrap();
    agent.set_session_token(Some(forged.token));

    agent.get(ADMIN).await.assert_unauthorized();
}

#[tokio::test]
async fn test_gate_rejects_expired_token() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;
    let user_id = app
        .state()
        .codec()
        .verify(agent.session_token().unwrap())
        .unwrap()
        .sub;

    let identity = Identity::new(user_id, UserFixtures::ALICE_EMAIL, Role::User);
    let stale = app
        .state()
        .codec()
        .issue_at(&identity, Utc::now().timestamp() - 2 * 86_400)
        .unwrap();
    agent.set_session_token(Some(stale.token));

    agent.get(PROTECTED).await.assert_unauthorized();
}

#[tokio::test]
async fn test_gate_valid_token_for_unknown_user() {
    let app = TestApp::new();
    let mut agent = app.agent();

    let ghost = app.state().codec().issue(&UserFixtures::user_identity()).unwrap();
    agent.set_session_token(Some(ghost.token));

    agent.get(PROTECTED).await.assert_unauthorized();
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;

    agent
        .logout()
        .await
        .assert_status(204)
        .assert_cleared_cookie("session");

    assert!(agent.session_token().is_none());
    agent.get(PROTECTED).await.assert_unauthorized();
}

#[tokio::test]
async fn test_logout_token_replay_stays_valid_until_expiry() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;
    let captured = agent.session_token().unwrap().to_string();

    agent.logout().await.assert_status(204);
    agent.get(PROTECTED).await.assert_unauthorized();

    agent.set_session_token(Some(captured));
    agent.get(PROTECTED).await.assert_status(200);
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::new();
    let mut agent = app.agent();

    agent
        .logout()
        .await
        .assert_status(204)
        .assert_cleared_cookie("session");
}

#[tokio::test]
async fn test_logout_then_login_again() {
    let app = TestApp::new();
    let mut agent = app.signed_in(&UserFixtures::alice()).await;

    agent.logout().await;
    agent
        .login(UserFixtures::ALICE_EMAIL, UserFixtures::PASSWORD)
        .await
        .assert_status(200);

    agent.get(PROTECTED).await.assert_status(200);
}
