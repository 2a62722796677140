// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # latch-api
//!
//! Session authentication for the Latch service.
//!
//! A login issues a signed token that travels in an HTTP-only cookie. Gates in
//! front of protected routes verify the token on every request and check the
//! caller's role.
//!
//! - [`auth`]: token codec, roles, authorization policy
//! - [`session`]: cookie transport
//! - [`gate`]: gate pipeline
//! - [`middleware`]: tower adapter for pipelines
//! - [`server`]: axum router and server

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod session;
pub mod state;
pub mod users;

pub use auth::{AuthContext, AuthError, Claims, Identity, IssuedToken, Role, TokenCodec};
pub use error::{ApiError, ApiResult};
pub use gate::{AuthenticationGate, Flow, Gate, GateContext, Pipeline, RoleGate};
pub use middleware::GateLayer;
pub use server::{ApiServer, ApiServerBuilder};
pub use session::SessionStore;
pub use state::AppState;
pub use users::{InMemoryUserService, NewUser, User, UserError, UserService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
