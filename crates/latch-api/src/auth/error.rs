// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication failure kinds.

use thiserror::Error;

/// Every way a request can fail the session gates.
///
/// The variants exist for logging and tests. Responses never tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The request carried no session cookie.
    #[error("no session cookie present")]
    NoSession,

    /// The session token failed verification.
    #[error("session token rejected")]
    InvalidSession,

    /// The identity's role does not satisfy the required role.
    #[error("insufficient privilege")]
    InsufficientPrivilege,
}

impl AuthError {
    /// Message shown to the client for any authentication failure.
    pub const PUBLIC_MESSAGE: &'static str = "You must be signed in to continue";

    /// Returns the error kind as a string for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::NoSession => "no_session",
            AuthError::InvalidSession => "invalid_session",
            AuthError::InsufficientPrivilege => "insufficient_privilege",
        }
    }
}
