// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use latch_config::schema::{DEFAULT_COOKIE_NAME, DEFAULT_ISSUER, DEFAULT_TOKEN_TTL_SECS};
use latch_config::MIN_SECRET_BYTES;

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints crate versions and the session defaults compiled into this build.
pub fn version(_cli: &Cli) -> BinResult<()> {
    print!("{}", report());
    Ok(())
}

fn report() -> String {
    format!(
        "latch {bin} (api {api}, config {config})\n\
         tokens:   HS256 | HS384 | HS512, issuer \"{DEFAULT_ISSUER}\", ttl {DEFAULT_TOKEN_TTL_SECS}s\n\
         cookie:   \"{DEFAULT_COOKIE_NAME}\", HttpOnly, Secure, SameSite=Strict\n\
         secret:   >= {MIN_SECRET_BYTES} bytes\n",
        bin = env!("CARGO_PKG_VERSION"),
        api = latch_api::VERSION,
        config = latch_config::VERSION,
    )
}
