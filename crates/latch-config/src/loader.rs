// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading for Latch.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and resolve `${VAR}` / `${VAR:default}` placeholders
//! 2. Parse YAML, TOML or JSON by extension
//! 3. Apply environment variable overrides
//! 4. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! JWT_SECRET=...                # session.jwt_secret
//! COOKIE_NAME=sid               # session.cookie_name
//! TOKEN_TTL_SECS=3600           # session.token_ttl_secs
//! COOKIE_SECURE=false           # session.secure_cookie
//! LATCH_SERVER_HOST=127.0.0.1
//! LATCH_SERVER_PORT=9090
//! LATCH_LOG_LEVEL=debug
//! LATCH_LOG_FORMAT=json
//! LATCH_ADMIN_EMAILS=a@x.io,b@x.io
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LatchConfig, LogFormat, LogLevel, SameSite, SecretValue};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Signing secret override.
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";

/// Cookie name override.
pub const ENV_COOKIE_NAME: &str = "COOKIE_NAME";

/// Token lifetime override.
pub const ENV_TOKEN_TTL_SECS: &str = "TOKEN_TTL_SECS";

/// Secure cookie flag override.
pub const ENV_COOKIE_SECURE: &str = "COOKIE_SECURE";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Latch.
///
/// # Examples
///
/// ```no_run
/// use latch_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("latch.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Prefix for service-level environment variables.
    env_prefix: String,

    /// Whether placeholders and overrides are applied.
    resolve_env_vars: bool,

    /// Fixed environment used instead of the process environment.
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: "LATCH".to_string(),
            resolve_env_vars: true,
            env: None,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Reads variables from `vars` instead of the process environment.
    pub fn with_env_map<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is chosen by extension: `.yaml`/`.yml`, `.toml` or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<LatchConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            cookie = %config.session.cookie_name,
            ttl_secs = config.session.token_ttl_secs,
            admins = config.users.admin_emails.len(),
            "Session settings"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<LatchConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };
        let mut config = parse_str(&content, format, "<string>")?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from defaults and the environment alone.
    pub fn load_from_env(&self) -> ConfigResult<LatchConfig> {
        info!("Loading configuration from environment");
        let mut config = LatchConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(name).cloned(),
            None => env::var(name).ok(),
        }
    }

    fn prefixed(&self, suffix: &str) -> String {
        format!("{}_{}", self.env_prefix, suffix)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<LatchConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        parse_str(&content, format, &path.display().to_string())
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// A placeholder without default whose variable is unset is an error, so
    /// `${JWT_SECRET}` can never survive as a literal secret.
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (self.var(var_name), default_value) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    return Err(ConfigError::UnsetVariable {
                        name: var_name.to_string(),
                    })
                }
            }
        }

        Ok(result)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut LatchConfig) -> ConfigResult<()> {
        // Session
        if let Some(value) = self.var(ENV_JWT_SECRET) {
            config.session.jwt_secret = Some(SecretValue::new(value));
        }
        if let Some(value) = self.var(ENV_COOKIE_NAME) {
            config.session.cookie_name = value;
        }
        if let Some(value) = self.var(ENV_TOKEN_TTL_SECS) {
            config.session.token_ttl_secs = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(ENV_TOKEN_TTL_SECS, "expected seconds as integer")
            })?;
        }
        if let Some(value) = self.var(ENV_COOKIE_SECURE) {
            config.session.secure_cookie = parse_bool(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(ENV_COOKIE_SECURE, "expected true or false")
            })?;
        }
        let name = self.prefixed("COOKIE_SAME_SITE");
        if let Some(value) = self.var(&name) {
            config.session.same_site = SameSite::parse(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(&name, "expected strict, lax or none"))?;
        }

        // Server
        let name = self.prefixed("SERVER_HOST");
        if let Some(value) = self.var(&name) {
            config.server.host = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected IP address"))?;
        }
        let name = self.prefixed("SERVER_PORT");
        if let Some(value) = self.var(&name) {
            config.server.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected valid port number"))?;
        }

        // Logging
        let name = self.prefixed("LOG_LEVEL");
        if let Some(value) = self.var(&name) {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!("Ignoring unknown log level in {}: {}", name, value),
            }
        }
        let name = self.prefixed("LOG_FORMAT");
        if let Some(value) = self.var(&name) {
            match parse_log_format(&value) {
                Some(format) => config.logging.format = format,
                None => warn!("Ignoring unknown log format in {}: {}", name, value),
            }
        }

        // Users
        if let Some(value) = self.var(&self.prefixed("ADMIN_EMAILS")) {
            config.users.admin_emails = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::UnsupportedFormat {
                extension: other.to_string(),
            }),
            None => Err(ConfigError::UnsupportedFormat {
                extension: "(none)".to_string(),
            }),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat, origin: &str) -> ConfigResult<LatchConfig> {
    let parsed = match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| ConfigError::Parse {
        origin: origin.to_string(),
        message,
    })
}

/// Parses a boolean flag; anything unrecognized is `None`.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "text" | "pretty" => Some(LogFormat::Text),
        "json" => Some(LogFormat::Json),
        "compact" => Some(LogFormat::Compact),
        _ => None,
    }
}

/// YAML parsing through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> Result<T, String> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|e| e.to_string())
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<LatchConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<LatchConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================
