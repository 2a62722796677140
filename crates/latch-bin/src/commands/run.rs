// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use latch_config::ConfigLoader;

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::logging::init_logging;
use crate::runtime::{resolve_config, RuntimeBuilder};

/// Executes the `run` command to start the server.
///
/// Logging is initialized from the loaded configuration, with CLI flags
/// taking precedence.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    let (config, source) = resolve_config(&ConfigLoader::new(), &cli.config)?;

    init_logging(
        cli.effective_log_level(config.logging.level.as_str()),
        cli.effective_log_format(config.logging.format.into()),
    );
    tracing::debug!(%source, "Configuration loaded");

    let runtime = RuntimeBuilder::new()
        .config(config)
        .source(source)
        .port(args.port)
        .build()?;

    runtime.run().await
}
