// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use latch_config::LatchConfig;

use crate::auth::TokenCodec;
use crate::error::ApiResult;
use crate::session::SessionStore;
use crate::users::{InMemoryUserService, UserService};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Every component is immutable after construction.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<LatchConfig>,
    /// Token signing and verification.
    pub codec: Arc<TokenCodec>,
    /// Session cookie transport.
    pub sessions: Arc<SessionStore>,
    /// User directory.
    pub users: Arc<dyn UserService>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Returns the user directory.
    pub fn users(&self) -> &dyn UserService {
        self.users.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("codec", &self.codec)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<LatchConfig>,
    users: Option<Arc<dyn UserService>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: LatchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the user directory.
    pub fn users(mut self, users: Arc<dyn UserService>) -> Self {
        self.users = Some(users);
        self
    }

    /// Builds the AppState.
    ///
    /// Fails with [`ApiError::Config`](crate::ApiError::Config) if the session
    /// configuration is invalid, so a bad cookie name or `SameSite=None`
    /// without `Secure` never reaches a login.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        config.session.validate()?;
        let codec = TokenCodec::new(&config.session)?;
        let sessions = SessionStore::new(&config.session);

        let users = self.users.unwrap_or_else(|| {
            Arc::new(InMemoryUserService::new(&config.users.admin_emails))
        });

        Ok(AppState {
            config: Arc::new(config),
            codec: Arc::new(codec),
            sessions: Arc::new(sessions),
            users,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
