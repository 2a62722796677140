// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! Resolves the configuration, builds the API server and serves it until a
//! shutdown signal arrives. In-flight requests get `server.shutdown_timeout_secs`
//! to drain.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use latch_api::{ApiResult, ApiServer, ApiServerBuilder};
use latch_config::{ConfigLoader, LatchConfig};
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// Configuration Resolution
// =============================================================================

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A configuration file.
    File(PathBuf),
    /// Defaults plus environment variables.
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// Loads the configuration from `path` if it exists, otherwise from the
/// environment. The result is validated either way.
pub fn resolve_config(
    loader: &ConfigLoader,
    path: &Path,
) -> BinResult<(LatchConfig, ConfigSource)> {
    if path.exists() {
        let config = loader
            .load(path)
            .map_err(|e| BinError::from(e).with_context(format!("Loading {}", path.display())))?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    } else {
        let config = loader
            .load_from_env()
            .map_err(|e| BinError::from(e).with_context("Loading configuration from environment"))?;
        Ok((config, ConfigSource::Environment))
    }
}

// =============================================================================
// ServiceRuntime
// =============================================================================

/// Owns the API server and its shutdown coordination.
pub struct ServiceRuntime {
    server: ApiServer,
    shutdown: ShutdownCoordinator,
    shutdown_timeout: Duration,
    source: ConfigSource,
}

impl ServiceRuntime {
    /// Returns a handle that can stop the runtime.
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Returns the configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.server.addr()
    }

    /// Returns where the configuration was loaded from.
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Binds the configured address and serves until shutdown.
    pub async fn run(self) -> BinResult<()> {
        let addr = self.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BinError::Bind { addr, source })?;

        self.serve(listener).await
    }

    /// Serves on `listener` until shutdown.
    pub async fn serve(self, listener: TcpListener) -> BinResult<()> {
        let Self {
            server,
            shutdown,
            shutdown_timeout,
            source,
        } = self;

        info!(
            "Starting Latch v{} (config: {})",
            latch_api::VERSION,
            source
        );

        let mut server_task = tokio::spawn(server.serve(listener, shutdown.shutdown_signal()));

        tokio::select! {
            joined = &mut server_task => return flatten(joined),
            _ = shutdown.wait_for_shutdown() => {}
        }

        info!("Draining in-flight requests");

        match tokio::time::timeout(shutdown_timeout, server_task).await {
            Ok(joined) => flatten(joined),
            Err(_) => {
                warn!(
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timed out, dropping open connections"
                );
                Ok(())
            }
        }
    }
}

fn flatten(joined: Result<ApiResult<()>, JoinError>) -> BinResult<()> {
    match joined {
        Ok(result) => result.map_err(BinError::from),
        Err(e) => Err(BinError::from(e)),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the service runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<LatchConfig>,
    source: Option<ConfigSource>,
    loader: Option<ConfigLoader>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: LatchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Records where a directly supplied configuration came from.
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the loader used to resolve the configuration.
    pub fn loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Overrides the configured bind port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ServiceRuntime> {
        let (mut config, source) = match self.config {
            Some(config) => {
                config.validate()?;
                (config, self.source.unwrap_or(ConfigSource::Environment))
            }
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::usage("no configuration or configuration path provided"))?;
                let loader = self.loader.unwrap_or_default();
                resolve_config(&loader, &path)?
            }
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        let shutdown_timeout = config.server.shutdown_timeout();
        let server = ApiServerBuilder::new()
            .config(config)
            .build()
            .map_err(|e| BinError::from(e).with_context("Building API server"))?;

        Ok(ServiceRuntime {
            server,
            shutdown: ShutdownCoordinator::new(),
            shutdown_timeout,
            source,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
