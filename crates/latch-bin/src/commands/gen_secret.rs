// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::cli::{Cli, GenSecretArgs, MIN_SECRET_BYTES};
use crate::error::{BinError, BinResult};

/// Returns `bytes` random bytes from the OS generator, base64url encoded.
pub fn generate_secret(bytes: usize) -> BinResult<String> {
    if bytes < MIN_SECRET_BYTES {
        return Err(BinError::usage(format!(
            "--bytes must be at least {}, got {}",
            MIN_SECRET_BYTES, bytes
        )));
    }

    let mut buf = vec![0u8; bytes];
    OsRng.try_fill_bytes(&mut buf)?;

    Ok(URL_SAFE_NO_PAD.encode(&buf))
}

/// Executes the `gen-secret` command.
pub fn gen_secret(_cli: &Cli, args: GenSecretArgs) -> BinResult<()> {
    let secret = generate_secret(args.bytes)?;
    println!("{}", secret);

    eprintln!();
    eprintln!("Store this secret securely. Use it as:");
    eprintln!("  export JWT_SECRET=<secret>");

    Ok(())
}
