// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Response assertions with failure messages that include the body.

use latch_api::AuthError;

use super::harness::TestResponse;

impl TestResponse {
    /// Assert the status code.
    #[track_caller]
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {} with body {}",
            expected,
            self.status,
            self.body
        );
        self
    }

    /// Assert the uniform authentication failure: 401, code `UNAUTHORIZED`
    /// and the public message.
    #[track_caller]
    pub fn assert_unauthorized(&self) -> &Self {
        self.assert_error(401, "UNAUTHORIZED");
        assert_eq!(
            self.body["error"]["message"],
            AuthError::PUBLIC_MESSAGE,
            "Unexpected message in {}",
            self.body
        );
        self
    }

    /// Assert an error status and code.
    #[track_caller]
    pub fn assert_error(&self, status: u16, code: &str) -> &Self {
        self.assert_status(status);
        assert_eq!(
            self.body["error"]["code"], code,
            "Unexpected error code in {}",
            self.body
        );
        self
    }

    /// Assert the response sets a session cookie with every security attribute.
    #[track_caller]
    pub fn assert_session_cookie(&self, name: &str) -> &Self {
        let cookie = self.set_cookie().expect("Expected a Set-Cookie header");
        assert!(
            cookie.starts_with(&format!("{}=", name)) && !cookie.starts_with(&format!("{}=;", name)),
            "Expected a {} cookie with a value, got {}",
            name,
            cookie
        );
        for attribute in ["Path=/", "HttpOnly", "Secure", "SameSite=Strict"] {
            assert!(
                cookie.contains(attribute),
                "Cookie {} is missing {}",
                cookie,
                attribute
            );
        }
        self
    }

    /// Assert the response clears the session cookie.
    #[track_caller]
    pub fn assert_cleared_cookie(&self, name: &str) -> &Self {
        let cookie = self.set_cookie().expect("Expected a Set-Cookie header");
        assert!(
            cookie.starts_with(&format!("{}=;", name)),
            "Expected an empty {} cookie, got {}",
            name,
            cookie
        );
        assert!(cookie.contains("Max-Age=0"), "Cookie {} is not expired", cookie);
        self
    }

    /// Assert the body never mentions `needle`.
    #[track_caller]
    pub fn assert_body_excludes(&self, needle: &str) -> &Self {
        assert!(
            !self.body.to_string().contains(needle),
            "Body unexpectedly contains {:?}: {}",
            needle,
            self.body
        );
        self
    }
}
