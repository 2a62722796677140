// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for Latch.
//!
//! # Schema Structure
//!
//! ```text
//! LatchConfig
//! ├── server: ServerConfig
//! ├── session: SessionConfig
//! ├── users: UsersConfig
//! └── logging: LoggingConfig
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default session cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "latch";

/// Minimum signing secret length in bytes (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for Latch.
///
/// Built once at process start and shared read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatchConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session token and cookie settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// User directory settings.
    #[serde(default)]
    pub users: UsersConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LatchConfig {
    /// Validates the whole configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.session.validate()?;
        self.users.validate()?;
        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs",
                "cannot be zero",
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Session token and cookie configuration.
///
/// The signing secret has no default: a process without one must refuse to
/// start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// HMAC signing secret.
    #[serde(default)]
    pub jwt_secret: Option<SecretValue>,

    /// Token lifetime in seconds. Also used as the cookie Max-Age.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Whether the cookie carries the `Secure` attribute.
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,

    /// SameSite policy of the cookie.
    #[serde(default)]
    pub same_site: SameSite,

    /// Token issuer, checked on verification.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Clock skew tolerance in seconds when checking expiry.
    #[serde(default)]
    pub leeway_secs: u64,

    /// Signing algorithm.
    #[serde(default)]
    pub algorithm: JwtAlgorithm,
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_secure_cookie() -> bool {
    true
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

impl SessionConfig {
    /// Creates a session configuration with the given secret and defaults
    /// for everything else.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(SecretValue::new(secret)),
            ..Default::default()
        }
    }

    /// Returns the token lifetime.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Returns the secret if one is configured and non-empty.
    pub fn secret(&self) -> Option<&SecretValue> {
        self.jwt_secret.as_ref().filter(|s| !s.is_empty())
    }

    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let secret = self.secret().ok_or(ConfigError::SecretMissing)?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                len: secret.len(),
                min: MIN_SECRET_BYTES,
            });
        }

        if !is_cookie_token(&self.cookie_name) {
            return Err(ConfigError::invalid(
                "session.cookie_name",
                "must be a non-empty RFC 6265 token",
            ));
        }

        if self.token_ttl_secs == 0 {
            return Err(ConfigError::invalid(
                "session.token_ttl_secs",
                "cannot be zero",
            ));
        }

        if self.same_site == SameSite::None && !self.secure_cookie {
            return Err(ConfigError::invalid(
                "session.same_site",
                "SameSite=None requires secure_cookie",
            ));
        }

        if self.issuer.is_empty() {
            return Err(ConfigError::invalid("session.issuer", "cannot be empty"));
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            jwt_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            secure_cookie: default_secure_cookie(),
            same_site: SameSite::default(),
            issuer: default_issuer(),
            leeway_secs: 0,
            algorithm: JwtAlgorithm::default(),
        }
    }
}

/// Returns `true` if `name` is a valid cookie name (RFC 6265 `token`).
pub fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}

/// Cookie SameSite policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Never sent on cross-site requests.
    #[default]
    Strict,
    /// Sent on top-level cross-site navigations.
    Lax,
    /// Always sent; requires `Secure`.
    None,
}

impl SameSite {
    /// Returns the attribute value as written in `Set-Cookie`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    /// Parses a SameSite value, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// HMAC signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

// =============================================================================
// Users Configuration
// =============================================================================

/// User directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersConfig {
    /// Emails that are granted the admin role on registration.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl UsersConfig {
    /// Validates the users configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (i, email) in self.admin_emails.iter().enumerate() {
            if !email.contains('@') {
                return Err(ConfigError::invalid(
                    format!("users.admin_emails[{}]", i),
                    format!("'{}' is not an email address", email),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a log level string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines for log aggregation.
    Json,
    /// Compact single-line output.
    Compact,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never appears in logs or serialized output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret. Callers must not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the secret as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("***")
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}
