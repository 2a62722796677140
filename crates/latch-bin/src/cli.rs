// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the service (default)
//! - `validate`: Validate the configuration
//! - `gen-secret`: Generate a token signing secret
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Smallest secret `gen-secret` will produce, in bytes.
pub const MIN_SECRET_BYTES: usize = latch_config::MIN_SECRET_BYTES;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Latch - session authentication service
///
/// Issues signed session tokens on login, carries them in an HTTP-only
/// cookie and gates protected routes on every request.
#[derive(Parser, Debug)]
#[command(
    name = "latch",
    author = "Sylvex <contact@sylvex.io>",
    version = latch_api::VERSION,
    about = "Cookie-based session authentication service",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "latch.yaml",
        env = "LATCH_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact). Overrides the config file.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the Latch CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server
    ///
    /// This is the default command when no subcommand is specified.
    /// The configuration file is used when present, otherwise the
    /// configuration is built from defaults and environment variables.
    Run(RunArgs),

    /// Validate the configuration
    ///
    /// Loads and validates the configuration without starting the server.
    Validate(ValidateArgs),

    /// Generate a token signing secret
    ///
    /// Prints a random base64url secret suitable for `JWT_SECRET`.
    #[command(name = "gen-secret")]
    GenSecret(GenSecretArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the configured bind port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation (secret redacted)
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `gen-secret` command.
#[derive(Args, Debug, Clone)]
pub struct GenSecretArgs {
    /// Number of random bytes
    #[arg(short, long, default_value_t = MIN_SECRET_BYTES)]
    pub bytes: usize,
}

impl Default for GenSecretArgs {
    fn default() -> Self {
        Self {
            bytes: MIN_SECRET_BYTES,
        }
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<latch_config::LogFormat> for LogFormat {
    fn from(format: latch_config::LogFormat) -> Self {
        match format {
            latch_config::LogFormat::Text => LogFormat::Text,
            latch_config::LogFormat::Json => LogFormat::Json,
            latch_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level.
    ///
    /// `-q` and `-v` win over `--log-level`, which wins over `fallback`.
    pub fn effective_log_level<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(fallback)
        }
    }

    /// Get the effective log format, falling back to `fallback`.
    pub fn effective_log_format(&self, fallback: LogFormat) -> LogFormat {
        self.log_format.unwrap_or(fallback)
    }
}

// =============================================================================
// Tests
// =============================================================================
