// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Auth Integration Tests
//!
//! Token codec, session store, policy and gate pipeline wired together
//! without the router.
//!
//! - `test_codec_*`: issue and verify
//! - `test_pipeline_*`: gate ordering and outcomes
//! - `test_policy_*`: role decisions

use axum::http::{header, HeaderMap, HeaderValue};
use latch_api::auth::policy::{authorize, Decision};
use latch_api::{AuthContext, AuthError, Pipeline, Role, SessionStore, TokenCodec};
use latch_config::SessionConfig;
use latch_tests::prelude::*;

/// Turns the Set-Cookie written by `attach` into a request Cookie header.
fn echo_cookie(store: &SessionStore, token: &str) -> HeaderMap {
    let mut response = HeaderMap::new();
    store.attach(&mut response, token).unwrap();

    let set_cookie = response[header::SET_COOKIE].to_str().unwrap();
    let pair = set_cookie.split(';').next().unwrap();

    let mut request = HeaderMap::new();
    request.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
    request
}

// =============================================================================
// Codec
// =============================================================================

#[test]
fn test_codec_round_trip_through_cookie() {
    let codec = ConfigFixtures::codec();
    let store = ConfigFixtures::store();
    let issued = codec.issue(&UserFixtures::user_identity()).unwrap();

    let headers = echo_cookie(&store, &issued.token);
    let token = store.extract(&headers).unwrap();

    assert_eq!(codec.verify(&token).unwrap(), issued.claims);
}

#[test]
fn test_codec_token_is_three_part_jwt() {
    let codec = ConfigFixtures::codec();
    let issued = codec.issue(&UserFixtures::admin_identity()).unwrap();

    assert_eq!(issued.token.split('.').count(), 3);
    assert_eq!(issued.claims.sub, "admin-001");
    assert_eq!(issued.claims.role, Role::Admin);
}

#[test]
fn test_codec_distinct_tokens_per_issue() {
    let codec = ConfigFixtures::codec();
    let identity = UserFixtures::user_identity();

    let first = codec.issue(&identity).unwrap();
    let second = codec.issue(&identity).unwrap();

    assert_ne!(first.claims.jti, second.claims.jti);
    assert_ne!(first.token, second.token);
}

#[test]
fn test_codec_rotated_secret_invalidates_tokens() {
    let issued = ConfigFixtures::codec()
        .issue(&UserFixtures::user_identity())
        .unwrap();
    let rotated = TokenCodec::new(&SessionConfig::with_secret(ConfigFixtures::OTHER_SECRET)).unwrap();

    assert_eq!(rotated.verify(&issued.token), Err(AuthError::InvalidSession));
}

#[test]
fn test_codec_refuses_empty_or_short_secret() {
    assert!(TokenCodec::new(&SessionConfig::with_secret("")).is_err());
    assert!(TokenCodec::new(&SessionConfig::with_secret("short")).is_err());
    assert!(TokenCodec::new(&SessionConfig::default()).is_err());
}

// =============================================================================
// Pipeline
// =============================================================================

#[test]
fn test_pipeline_authenticated_restores_identity() {
    let codec = ConfigFixtures::codec();
    let store = ConfigFixtures::store();
    let issued = codec.issue(&UserFixtures::user_identity()).unwrap();

    let pipeline = Pipeline::authenticated(codec, store.clone());
    let ctx = pipeline.run(&echo_cookie(&store, &issued.token)).unwrap();

    let auth = ctx.auth.unwrap();
    assert_eq!(auth.user_id, "user-001");
    assert_eq!(auth.role, Role::User);
    assert_eq!(auth.token_id, issued.claims.jti);
}

#[test]
fn test_pipeline_no_cookie_halts_with_no_session() {
    let pipeline = Pipeline::require_role(ConfigFixtures::codec(), ConfigFixtures::store(), Role::Admin);

    assert_eq!(pipeline.run(&HeaderMap::new()).unwrap_err(), AuthError::NoSession);
}

#[test]
fn test_pipeline_other_cookies_are_ignored() {
    let pipeline = Pipeline::authenticated(ConfigFixtures::codec(), ConfigFixtures::store());
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; lang=en"));

    assert_eq!(pipeline.run(&headers).unwrap_err(), AuthError::NoSession);
}

#[test]
fn test_pipeline_user_on_admin_gate_is_insufficient_privilege() {
    let codec = ConfigFixtures::codec();
    let store = ConfigFixtures::store();
    let issued = codec.issue(&UserFixtures::user_identity()).unwrap();

    let pipeline = Pipeline::require_role(codec, store.clone(), Role::Admin);
    assert_eq!(pipeline.gate_names(), vec!["authentication", "role"]);

    let err = pipeline.run(&echo_cookie(&store, &issued.token)).unwrap_err();
    assert_eq!(err, AuthError::InsufficientPrivilege);
}

#[test]
fn test_pipeline_admin_passes_admin_gate() {
    let codec = ConfigFixtures::codec();
    let store = ConfigFixtures::store();
    let issued = codec.issue(&UserFixtures::admin_identity()).unwrap();

    let pipeline = Pipeline::require_role(codec, store.clone(), Role::Admin);
    assert!(pipeline.run(&echo_cookie(&store, &issued.token)).is_ok());
}

#[test]
fn test_pipeline_garbage_cookie_is_invalid_session() {
    let store = ConfigFixtures::store();
    let pipeline = Pipeline::authenticated(ConfigFixtures::codec(), store.clone());

    let err = pipeline.run(&echo_cookie(&store, "not-a-token")).unwrap_err();
    assert_eq!(err, AuthError::InvalidSession);
}

// =============================================================================
// Policy
// =============================================================================

#[test]
fn test_policy_role_ordering() {
    let codec = ConfigFixtures::codec();
    let user = AuthContext::from_claims(&codec.issue(&UserFixtures::user_identity()).unwrap().claims);
    let admin = AuthContext::from_claims(&codec.issue(&UserFixtures::admin_identity()).unwrap().claims);

    assert_eq!(authorize(&user, Role::User), Decision::Allow);
    assert_eq!(
        authorize(&user, Role::Admin),
        Decision::Deny(AuthError::InsufficientPrivilege)
    );
    assert!(authorize(&admin, Role::User).is_allowed());
    assert!(authorize(&admin, Role::Admin).is_allowed());
}

#[test]
fn test_policy_failures_share_public_message() {
    for err in [
        AuthError::NoSession,
        AuthError::InvalidSession,
        AuthError::InsufficientPrivilege,
    ] {
        let api: latch_api::ApiError = err.into();
        assert_eq!(api.status_code().as_u16(), 401);
        assert_eq!(api.user_message(), AuthError::PUBLIC_MESSAGE);
    }
}
