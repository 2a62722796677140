// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use latch_config::{ConfigLoader, LatchConfig, SameSite};
use serde_json::{json, Value};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::BinResult;
use crate::runtime::{resolve_config, ConfigSource};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let (config, source) = resolve_config(&ConfigLoader::new(), &cli.config)?;
    let warnings = warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid ({})", source);
            println!();
            println!("Summary:");
            println!("  Listen:       {}", config.server.socket_addr());
            println!("  Cookie:       {}", config.session.cookie_name);
            println!("  Token TTL:    {}s", config.session.token_ttl_secs);
            println!("  Secure:       {}", config.session.secure_cookie);
            println!("  SameSite:     {}", config.session.same_site.as_str());
            println!("  Issuer:       {}", config.session.issuer);
            println!("  Admins:       {}", config.users.admin_emails.len());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", to_pretty(&config_value(&config)?)?);
            }
        }
        OutputFormat::Json => {
            let mut output = summary(&config, &source);
            output["warnings"] = json!(warnings);
            if args.show_config {
                output["config"] = config_value(&config)?;
            }
            println!("{}", to_pretty(&output)?);
        }
    }

    Ok(())
}

/// Builds the machine-readable validation summary. Never includes the secret.
pub fn summary(config: &LatchConfig, source: &ConfigSource) -> Value {
    json!({
        "valid": true,
        "source": source.to_string(),
        "summary": {
            "listen": config.server.socket_addr().to_string(),
            "cookie_name": config.session.cookie_name,
            "token_ttl_secs": config.session.token_ttl_secs,
            "secure_cookie": config.session.secure_cookie,
            "same_site": config.session.same_site.as_str(),
            "issuer": config.session.issuer,
            "admin_count": config.users.admin_emails.len(),
        },
    })
}

fn warnings(config: &LatchConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.session.secure_cookie {
        warnings.push("Session cookie is sent over plain HTTP (secure_cookie: false)".to_string());
    }
    if config.session.same_site != SameSite::Strict {
        warnings.push(format!(
            "SameSite is {}; cross-site requests will carry the session",
            config.session.same_site.as_str()
        ));
    }
    if config.users.admin_emails.is_empty() {
        warnings.push("No admin emails configured".to_string());
    }

    warnings
}

fn config_value(config: &LatchConfig) -> BinResult<Value> {
    Ok(serde_json::to_value(config)?)
}

fn to_pretty(value: &Value) -> BinResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
