// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

// =============================================================================
// Identity
// =============================================================================

/// An authenticated user, as returned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user ID.
    pub user_id: String,
    /// Login email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }
}

/// The part of a session that the token carries: who, with what role, since when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    /// User ID.
    pub user_id: String,
    /// Role at issue time.
    pub role: Role,
    /// Issue time (Unix timestamp).
    pub issued_at: i64,
}

// =============================================================================
// Claims
// =============================================================================

/// JWT payload for a session token.
///
/// Claims are fixed once the token is signed. A role change for the user only
/// takes effect on the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,

    /// Role at issue time.
    pub role: Role,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issuer.
    pub iss: String,

    /// Unique token ID.
    pub jti: String,
}

impl Claims {
    /// Creates claims for `user_id` issued at `now` and valid for `ttl_secs`.
    pub fn new(
        user_id: impl Into<String>,
        role: Role,
        now: i64,
        ttl_secs: i64,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            sub: user_id.into(),
            role,
            iat: now,
            exp: now.saturating_add(ttl_secs),
            iss: issuer.into(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Returns the identity triple carried by the token.
    pub fn identity_claim(&self) -> IdentityClaim {
        IdentityClaim {
            user_id: self.sub.clone(),
            role: self.role,
            issued_at: self.iat,
        }
    }

    /// Returns `true` if the token is expired at `now`, allowing `leeway_secs`
    /// of clock skew.
    pub fn is_expired_at(&self, now: i64, leeway_secs: u64) -> bool {
        let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
        now > self.exp.saturating_add(leeway)
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp(), 0)
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}
