// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based authorization.

use super::{AuthContext, AuthError, Role};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Access granted.
    Allow,
    /// Access refused.
    Deny(AuthError),
}

impl Decision {
    /// Returns `true` if access is granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts the decision into a `Result`.
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(err) => Err(err),
        }
    }
}

/// Decides whether `identity` may access a resource that requires `required`.
pub fn authorize(identity: &AuthContext, required: Role) -> Decision {
    if identity.role.satisfies(required) {
        Decision::Allow
    } else {
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            required = %required,
            "Insufficient privilege"
        );
        Decision::Deny(AuthError::InsufficientPrivilege)
    }
}
