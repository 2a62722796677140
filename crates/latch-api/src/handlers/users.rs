// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User and session handlers.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::auth::AuthError;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, ValidatedJson};
use crate::response::{SessionResponse, UserResponse};
use crate::state::AppState;
use crate::users::{NewUser, UserError};

// =============================================================================
// Registration
// =============================================================================

/// POST /api/v1/users
///
/// Registers a new user.
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users().create(request).await?;
    Ok(Json(user.into()))
}

// =============================================================================
// Sessions
// =============================================================================

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/users/sessions
///
/// Checks credentials, issues a session token and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let identity = state
        .users()
        .authenticate(&request.email, &request.password)
        .await?;
    let user = state.users().find_by_id(&identity.user_id).await?;
    let issued = state.codec().issue(&identity)?;

    let mut headers = HeaderMap::new();
    state.sessions().attach(&mut headers, &issued.token)?;

    tracing::info!(
        user_id = %identity.user_id,
        token_id = %issued.claims.jti,
        "User signed in"
    );

    Ok((headers, Json(SessionResponse::signed_in(user))))
}

/// DELETE /api/v1/users/sessions
///
/// Clears the session cookie. The token itself stays valid until it expires.
pub async fn logout(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let mut headers = HeaderMap::new();
    state.sessions().clear(&mut headers)?;

    match state
        .sessions()
        .extract(&request_headers)
        .map(|token| state.codec().verify(&token))
    {
        Some(Ok(claims)) => tracing::info!(user_id = %claims.sub, "User signed out"),
        _ => tracing::debug!("Session cleared without a valid session"),
    }

    Ok((StatusCode::NO_CONTENT, headers))
}

// =============================================================================
// Gated Resources
// =============================================================================

/// GET /api/v1/users/protected
///
/// Returns the signed-in user.
pub async fn current_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users()
        .find_by_id(&ctx.user_id)
        .await
        .map_err(|e| match e {
            // A verified token for a user that no longer exists.
            UserError::NotFound(_) => ApiError::from(AuthError::InvalidSession),
            other => other.into(),
        })?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users
///
/// Lists every user. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users().list().await?;
    tracing::debug!(user_id = %ctx.user_id, count = users.len(), "Listing users");
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
