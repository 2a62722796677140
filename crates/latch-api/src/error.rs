// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Every failure is a value until it reaches the HTTP boundary, where
//! [`ApiError`] turns it into a status code and a JSON body:
//!
//! ```json
//! { "error": { "code": "UNAUTHORIZED", "message": "You must be signed in to continue" } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use latch_config::ConfigError;

use crate::auth::AuthError;
use crate::users::UserError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message shown for rejected login attempts.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Session gate rejection (401).
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// User directory failure.
    #[error("User error: {0}")]
    User(#[from] UserError),

    /// Bad request (400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The session configuration cannot back a server. Raised while
    /// building state, before any request is served.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::User(e) => match e {
                UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                UserError::NotFound(_) => StatusCode::NOT_FOUND,
                UserError::EmailTaken => StatusCode::CONFLICT,
                UserError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Config(_) | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Auth(_) => "UNAUTHORIZED",
            ApiError::User(e) => match e {
                UserError::InvalidCredentials => "INVALID_CREDENTIALS",
                UserError::NotFound(_) => "NOT_FOUND",
                UserError::EmailTaken => "CONFLICT",
                UserError::Validation(_) => "VALIDATION_ERROR",
                UserError::Internal(_) => "INTERNAL_ERROR",
            },
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Config(_) | ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns a message that is safe to show to clients.
    ///
    /// Authentication failures share one message regardless of cause.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(_) => AuthError::PUBLIC_MESSAGE.to_string(),
            ApiError::User(e) => match e {
                UserError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
                UserError::NotFound(_) => "User not found".to_string(),
                UserError::EmailTaken => "Email is already registered".to_string(),
                UserError::Validation(message) => message.clone(),
                UserError::Internal(_) => "Internal server error".to_string(),
            },
            ApiError::BadRequest { message } => message.clone(),
            ApiError::Config(_) | ApiError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = error_code,
                status = %status,
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = error_code,
                status = %status,
                "Client error occurred"
            );
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: error_code.to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================
