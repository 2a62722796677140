// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Latch - cookie-based session authentication service.

use latch_bin::cli::{Cli, Commands, LogFormat};
use latch_bin::error::report_error_and_exit;
use latch_bin::{commands, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // `run` initializes logging itself once the config is loaded.
    if !matches!(cli.effective_command(), Commands::Run(_)) {
        init_logging(
            cli.effective_log_level("warn"),
            cli.effective_log_format(LogFormat::Text),
        );
    }

    if let Err(e) = commands::execute(cli).await {
        report_error_and_exit(e);
    }
}
