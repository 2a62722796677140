// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use std::net::IpAddr;

use serde::Serialize;
use uuid::Uuid;

use super::{Claims, Role};

/// Identity bound to a single request after its session token verified.
///
/// Lives in the request extensions and is dropped with the request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    /// User ID.
    pub user_id: String,
    /// Role carried by the token.
    pub role: Role,
    /// Token issue time (Unix timestamp).
    pub issued_at: i64,
    /// Token expiry (Unix timestamp).
    pub expires_at: i64,
    /// Token ID.
    pub token_id: String,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates a context from verified claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
            token_id: claims.jti.clone(),
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if this context has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::new("user123", Role::Admin, 100, 50, "latch");
        let ctx = AuthContext::from_claims(&claims)
            .with_client_ip("10.0.0.1".parse().unwrap());

        assert_eq!(ctx.user_id, "user123");
        assert_eq!(ctx.issued_at, 100);
        assert_eq!(ctx.expires_at, 150);
        assert_eq!(ctx.token_id, claims.jti);
        assert!(ctx.is_admin());
        assert!(ctx.client_ip.is_some());
    }
}
