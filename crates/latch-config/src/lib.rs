// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # latch-config
//!
//! Configuration management for the Latch session-authentication service.
//!
//! ## Features
//!
//! - **Schema Definition**: server, session, users and logging sections
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `JWT_SECRET`, `COOKIE_NAME` and `LATCH_*` variables
//! - **Secret Handling**: the signing secret is redacted in every rendering
//!
//! ## Quick Start
//!
//! ```no_run
//! use latch_config::loader::load_config;
//!
//! let config = load_config("latch.yaml").unwrap();
//! println!("Cookie: {}", config.session.cookie_name);
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! session:
//!   jwt_secret: "${JWT_SECRET}"
//!   cookie_name: "${COOKIE_NAME:session}"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    JwtAlgorithm, LatchConfig, LogFormat, LogLevel, LoggingConfig, SameSite, SecretValue,
    ServerConfig, SessionConfig, UsersConfig, MIN_SECRET_BYTES,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
