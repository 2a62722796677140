// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration errors.
//!
//! Any of these stops startup. None of them carries the signing secret.

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension names no supported format.
    #[error("unsupported config format '{extension}' (expected yaml, toml or json)")]
    UnsupportedFormat {
        /// Offending extension.
        extension: String,
    },

    /// The document is not valid for its format or the schema.
    #[error("cannot parse {origin}: {message}")]
    Parse {
        /// File path, or `<string>` for inline content.
        origin: String,
        /// Parser message.
        message: String,
    },

    /// A `${VAR}` placeholder without default names an unset variable.
    #[error("placeholder ${{{name}}} refers to an unset environment variable")]
    UnsetVariable {
        /// Variable name.
        name: String,
    },

    /// An override variable holds a value that cannot be used.
    #[error("invalid value in environment variable {name}: {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// What was expected.
        message: String,
    },

    /// No signing secret was configured, or it is empty.
    #[error("session.jwt_secret is not set (configure it or export JWT_SECRET)")]
    SecretMissing,

    /// The signing secret is shorter than the accepted minimum.
    #[error("session.jwt_secret is {len} bytes, at least {min} are required")]
    SecretTooShort {
        /// Actual length in bytes.
        len: usize,
        /// Minimum length in bytes.
        min: usize,
    },

    /// Any other setting that fails validation.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Dotted path of the setting.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Creates an [`ConfigError::Invalid`] for `field`.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an [`ConfigError::InvalidEnvVar`] for `name`.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the signing secret is missing or too short.
    pub fn is_secret_error(&self) -> bool {
        matches!(
            self,
            ConfigError::SecretMissing | ConfigError::SecretTooShort { .. }
        )
    }
}

/// A Result type with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_never_echo_secret_values() {
        let err = ConfigError::SecretTooShort { len: 9, min: 32 };
        assert_eq!(
            err.to_string(),
            "session.jwt_secret is 9 bytes, at least 32 are required"
        );
        assert!(err.is_secret_error());
        assert!(ConfigError::SecretMissing.is_secret_error());
    }

    #[test]
    fn test_unset_variable_message() {
        let err = ConfigError::UnsetVariable {
            name: "JWT_SECRET".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "placeholder ${JWT_SECRET} refers to an unset environment variable"
        );
        assert!(!err.is_secret_error());
    }

    #[test]
    fn test_invalid_names_field() {
        let err = ConfigError::invalid("session.cookie_name", "must be a token");
        assert_eq!(err.to_string(), "invalid session.cookie_name: must be a token");
    }
}
