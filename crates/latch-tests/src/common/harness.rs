// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestApp`] runs the full router in-process. An [`Agent`] drives it like a
//! browser: it stores the session cookie from `Set-Cookie`, sends it back on
//! every request and forgets it when the server clears it.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use latch_api::{ApiServerBuilder, AppState, NewUser};
use latch_config::LatchConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::fixtures::{ConfigFixtures, UserFixtures};

// =============================================================================
// TestApp
// =============================================================================

/// The application under test.
pub struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    /// Creates an app over [`ConfigFixtures::config`].
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::config())
    }

    /// Creates an app over `config` with a cheap-hashing user directory.
    pub fn with_config(config: LatchConfig) -> Self {
        let server = ApiServerBuilder::new()
            .config(config)
            .users(Arc::new(UserFixtures::directory()))
            .build()
            .expect("test config is valid");

        Self {
            router: server.router(),
            state: server.state().clone(),
        }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates a new agent with an empty cookie jar.
    pub fn agent(&self) -> Agent {
        Agent {
            router: self.router.clone(),
            cookie_name: self.state.sessions().cookie_name().to_string(),
            session: None,
        }
    }

    /// Registers `user` and returns an agent signed in as that user.
    pub async fn signed_in(&self, user: &NewUser) -> Agent {
        let mut agent = self.agent();
        agent.register(user).await.assert_status(200);
        agent.login(&user.email, &user.password).await.assert_status(200);
        agent
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Agent
// =============================================================================

/// A client with a single-cookie jar.
#[derive(Clone)]
pub struct Agent {
    router: Router,
    cookie_name: String,
    session: Option<String>,
}

impl Agent {
    /// Returns the stored session token.
    pub fn session_token(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Replaces the stored session token.
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session = token;
    }

    /// POST /api/v1/users
    pub async fn register(&mut self, user: &NewUser) -> TestResponse {
        let body = json!({
            "firstName": user.first_name,
            "lastName": user.last_name,
            "email": user.email,
            "password": user.password,
        });
        self.send(Method::POST, "/api/v1/users", Some(body)).await
    }

    /// POST /api/v1/users/sessions
    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        let body = json!({ "email": email, "password": password });
        self.send(Method::POST, "/api/v1/users/sessions", Some(body))
            .await
    }

    /// DELETE /api/v1/users/sessions
    pub async fn logout(&mut self) -> TestResponse {
        self.send(Method::DELETE, "/api/v1/users/sessions", None).await
    }

    /// GET `path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    /// Sends a request, attaching and updating the session cookie.
    pub async fn send(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = &self.session {
            builder = builder.header(header::COOKIE, format!("{}={}", self.cookie_name, token));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = send(&self.router, request).await;
        self.absorb(&response.headers);
        response
    }

    /// Sends a raw request without touching the jar.
    pub async fn send_raw(&self, request: Request<Body>) -> TestResponse {
        send(&self.router, request).await
    }

    fn absorb(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(cookie) = value.to_str() else { continue };
            let Some((name, rest)) = cookie.split_once('=') else {
                continue;
            };
            if name != self.cookie_name {
                continue;
            }
            let token = rest.split(';').next().unwrap_or_default();
            if token.is_empty() || cookie.contains("Max-Age=0") {
                self.session = None;
            } else {
                self.session = Some(token.to_string());
            }
        }
    }
}

async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

// =============================================================================
// TestResponse
// =============================================================================

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// JSON body, or `Null` when empty.
    pub body: Value,
}

impl TestResponse {
    /// Returns the first `Set-Cookie` header.
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v: &HeaderValue| v.to_str().ok())
    }
}
