// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the Latch binary.
//!
//! Exit codes follow `sysexits.h`, so a supervisor can tell a bad
//! configuration (78) from a port that was already taken (69).

use std::net::SocketAddr;

use latch_api::ApiError;
use latch_config::ConfigError;
use thiserror::Error;

/// Result type alias for latch-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that end a `latch` invocation.
#[derive(Debug, Error)]
pub enum BinError {
    /// The configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A command was invoked with arguments it cannot honor.
    #[error("{0}")]
    Usage(String),

    /// The listen address could not be bound.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        /// Configured address.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The API server failed to start or stopped with an error.
    #[error(transparent)]
    Server(#[from] ApiError),

    /// The server task panicked or was cancelled.
    #[error("server task ended abnormally: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The OS random generator failed.
    #[error("OS random generator failed: {0}")]
    Entropy(#[from] rand::Error),

    /// Command output could not be rendered.
    #[error("cannot render output: {0}")]
    Output(#[from] serde_json::Error),

    /// An error annotated with the step that failed.
    #[error("{context}")]
    Context {
        /// The step that failed.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// `EX_USAGE`
    pub const EXIT_USAGE: i32 = 64;
    /// `EX_UNAVAILABLE`
    pub const EXIT_UNAVAILABLE: i32 = 69;
    /// `EX_SOFTWARE`
    pub const EXIT_SOFTWARE: i32 = 70;
    /// `EX_OSERR`
    pub const EXIT_OSERR: i32 = 71;
    /// `EX_IOERR`
    pub const EXIT_IOERR: i32 = 74;
    /// `EX_CONFIG`
    pub const EXIT_CONFIG: i32 = 78;

    /// Creates a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Wraps the error with the step that failed.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => Self::EXIT_CONFIG,
            Self::Usage(_) => Self::EXIT_USAGE,
            Self::Bind { .. } => Self::EXIT_UNAVAILABLE,
            Self::Server(ApiError::Config(_)) => Self::EXIT_CONFIG,
            Self::Server(_) | Self::Task(_) => Self::EXIT_SOFTWARE,
            Self::Entropy(_) => Self::EXIT_OSERR,
            Self::Output(_) => Self::EXIT_IOERR,
            Self::Context { source, .. } => source.exit_code(),
        }
    }
}

/// Prints the error and its causes to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("latch: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with its code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_78() {
        let err: BinError = ConfigError::SecretMissing.into();
        assert_eq!(err.exit_code(), BinError::EXIT_CONFIG);
        assert!(err.to_string().contains("session.jwt_secret"));
    }

    #[test]
    fn test_context_keeps_exit_code_and_chain() {
        let err = BinError::from(ConfigError::SecretMissing).with_context("Loading latch.yaml");

        assert_eq!(err.to_string(), "Loading latch.yaml");
        assert_eq!(err.exit_code(), BinError::EXIT_CONFIG);
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_bind_failure_is_unavailable() {
        let err = BinError::Bind {
            addr: "127.0.0.1:8080".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(err.exit_code(), BinError::EXIT_UNAVAILABLE);
        assert_eq!(err.to_string(), "cannot listen on 127.0.0.1:8080: in use");
    }

    #[test]
    fn test_usage_and_server_codes() {
        assert_eq!(BinError::usage("bad").exit_code(), BinError::EXIT_USAGE);
        assert_eq!(
            BinError::from(ApiError::internal("boom")).exit_code(),
            BinError::EXIT_SOFTWARE
        );
        let rejected = ApiError::from(ConfigError::invalid("session.cookie_name", "bad"));
        assert_eq!(BinError::from(rejected).exit_code(), BinError::EXIT_CONFIG);
    }
}
