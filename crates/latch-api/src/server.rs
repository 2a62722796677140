// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    handler::Handler,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use latch_config::LatchConfig;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::auth::Role;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::GateLayer;
use crate::state::AppState;
use crate::users::UserService;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// | Method | Path                      | Gate          |
/// |--------|---------------------------|---------------|
/// | GET    | `/health`                 | none          |
/// | POST   | `/api/v1/users`           | none          |
/// | POST   | `/api/v1/users/sessions`  | none          |
/// | DELETE | `/api/v1/users/sessions`  | none          |
/// | GET    | `/api/v1/users/protected` | authenticated |
/// | GET    | `/api/v1/users`           | admin         |
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let codec = self.state.codec.clone();
        let sessions = self.state.sessions.clone();
        let authenticated = GateLayer::authenticated(codec.clone(), sessions.clone());
        let admin_only = GateLayer::require_role(codec, sessions, Role::Admin);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.state.config.server.request_timeout(),
            ));

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/v1/users",
                post(handlers::create_user).get(handlers::list_users.layer(admin_only)),
            )
            .route(
                "/api/v1/users/sessions",
                post(handlers::login).delete(handlers::logout),
            )
            .route(
                "/api/v1/users/protected",
                get(handlers::current_user.layer(authenticated)),
            )
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server with graceful shutdown on the configured address.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let local = listener
            .local_addr()
            .map_err(|e| ApiError::internal(format!("Listener has no address: {}", e)))?;
        let router = self.router();

        info!("Starting API server on {}", local);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.server.socket_addr()
    }
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
#[derive(Default)]
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: LatchConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the user directory.
    pub fn users(mut self, users: Arc<dyn UserService>) -> Self {
        self.state_builder = self.state_builder.users(users);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

// =============================================================================
// Tests
// =============================================================================
