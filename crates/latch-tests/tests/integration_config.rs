// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! - `test_load_*`: file formats and placeholders
//! - `test_env_*`: environment overrides
//! - `test_validate_*`: startup refusals
//! - `test_wired_*`: loaded configuration driving the session layer

use std::path::PathBuf;

use latch_api::{AuthError, SessionStore, TokenCodec};
use latch_config::{ConfigError, ConfigFormat, ConfigLoader, LogFormat, SameSite};
use latch_tests::common::temp_test_dir;
use latch_tests::prelude::*;

fn isolated() -> ConfigLoader {
    ConfigLoader::new().with_env_map(Vec::<(String, String)>::new())
}

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_yaml_toml_json_agree() {
    let dir = temp_test_dir("latch-config");
    let secret = ConfigFixtures::SECRET;

    let yaml = write(
        &dir,
        "latch.yaml",
        &format!(
            "server:\n  port: 9100\nsession:\n  cookie_name: sid\n  jwt_secret: \"{secret}\"\n  same_site: lax\n"
        ),
    );
    let toml = write(
        &dir,
        "latch.toml",
        &format!(
            "[server]\nport = 9100\n\n[session]\ncookie_name = \"sid\"\njwt_secret = \"{secret}\"\nsame_site = \"lax\"\n"
        ),
    );
    let json = write(
        &dir,
        "latch.json",
        &format!(
            r#"{{"server":{{"port":9100}},"session":{{"cookie_name":"sid","jwt_secret":"{secret}","same_site":"lax"}}}}"#
        ),
    );

    for path in [yaml, toml, json] {
        let config = isolated().load(&path).unwrap();
        assert_eq!(config.server.port, 9100, "{}", path.display());
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.same_site, SameSite::Lax);
        assert_eq!(config.session.secret().unwrap().expose(), secret);
    }
}

#[test]
fn test_load_resolves_secret_placeholder() {
    let dir = temp_test_dir("latch-config");
    let path = write(&dir, "latch.yaml", "session:\n  jwt_secret: \"${JWT_SECRET}\"\n");

    let loader = ConfigLoader::new().with_env_map([("JWT_SECRET", ConfigFixtures::SECRET)]);
    let config = loader.load(&path).unwrap();

    assert_eq!(config.session.secret().unwrap().expose(), ConfigFixtures::SECRET);
}

#[test]
fn test_load_unset_secret_placeholder_refuses_start() {
    let dir = temp_test_dir("latch-config");
    let path = write(
        &dir,
        "latch.yaml",
        "session:\n  jwt_secret: \"${LATCH_PRODUCTION_SESSION_SIGNING_KEY}\"\n",
    );

    match isolated().load(&path) {
        Err(ConfigError::UnsetVariable { name }) => {
            assert_eq!(name, "LATCH_PRODUCTION_SESSION_SIGNING_KEY")
        }
        other => panic!("expected UnsetVariable, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_load_placeholder_default() {
    let content = format!(
        "session:\n  jwt_secret: \"{}\"\n  cookie_name: \"${{LATCH_TEST_COOKIE:fallback_sid}}\"\n",
        ConfigFixtures::SECRET
    );
    let config = isolated().load_from_str(&content, ConfigFormat::Yaml).unwrap();

    assert_eq!(config.session.cookie_name, "fallback_sid");
}

#[test]
fn test_load_unknown_field_rejected() {
    let content = format!(
        "session:\n  jwt_secret: \"{}\"\n  cookie_nmae: typo\n",
        ConfigFixtures::SECRET
    );
    assert!(isolated().load_from_str(&content, ConfigFormat::Yaml).is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = temp_test_dir("latch-config");
    let result = isolated().load(dir.path().join("absent.yaml"));
    assert!(result.is_err());
}

#[test]
fn test_load_unsupported_extension() {
    let dir = temp_test_dir("latch-config");
    let path = write(&dir, "latch.ini", "[session]\n");
    assert!(isolated().load(&path).is_err());
}

// =============================================================================
// Environment
// =============================================================================

#[test]
fn test_env_overrides_file_values() {
    let dir = temp_test_dir("latch-config");
    let path = write(
        &dir,
        "latch.yaml",
        &format!(
            "session:\n  jwt_secret: \"{}\"\n  cookie_name: from_file\n",
            ConfigFixtures::SECRET
        ),
    );

    let loader = ConfigLoader::new().with_env_map([
        ("COOKIE_NAME", "from_env"),
        ("TOKEN_TTL_SECS", "600"),
        ("COOKIE_SECURE", "false"),
        ("LATCH_SERVER_PORT", "9200"),
        ("LATCH_LOG_FORMAT", "json"),
        ("LATCH_ADMIN_EMAILS", "root@example.com, ops@example.com"),
    ]);
    let config = loader.load(&path).unwrap();

    assert_eq!(config.session.cookie_name, "from_env");
    assert_eq!(config.session.token_ttl_secs, 600);
    assert!(!config.session.secure_cookie);
    assert_eq!(config.server.port, 9200);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(
        config.users.admin_emails,
        vec!["root@example.com", "ops@example.com"]
    );
}

#[test]
fn test_env_only_configuration() {
    let loader = ConfigLoader::new().with_env_map([("JWT_SECRET", ConfigFixtures::SECRET)]);
    let config = loader.load_from_env().unwrap();

    assert_eq!(config.session.cookie_name, "session");
    assert_eq!(config.session.token_ttl_secs, 86_400);
}

#[test]
fn test_env_cookie_secure_typo_is_error() {
    let loader = ConfigLoader::new().with_env_map([
        ("JWT_SECRET", ConfigFixtures::SECRET),
        ("COOKIE_SECURE", "ture"),
    ]);
    assert!(matches!(
        loader.load_from_env(),
        Err(ConfigError::InvalidEnvVar { .. })
    ));
}

#[test]
fn test_env_bad_ttl_is_error() {
    let loader = ConfigLoader::new().with_env_map([
        ("JWT_SECRET", ConfigFixtures::SECRET),
        ("TOKEN_TTL_SECS", "a day"),
    ]);
    assert!(matches!(
        loader.load_from_env(),
        Err(ConfigError::InvalidEnvVar { .. })
    ));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_refuses_missing_or_short_secret() {
    assert!(isolated().load_from_env().is_err());

    let short = ConfigLoader::new().with_env_map([("JWT_SECRET", "too-short")]);
    assert!(short.load_from_env().is_err());

    let empty = ConfigLoader::new().with_env_map([("JWT_SECRET", "")]);
    assert!(empty.load_from_env().is_err());
}

#[test]
fn test_validate_same_site_none_requires_secure() {
    let loader = ConfigLoader::new().with_env_map([
        ("JWT_SECRET", ConfigFixtures::SECRET),
        ("COOKIE_SECURE", "false"),
        ("LATCH_COOKIE_SAME_SITE", "none"),
    ]);
    assert!(loader.load_from_env().is_err());
}

#[test]
fn test_validate_cookie_name_must_be_token() {
    let loader = ConfigLoader::new().with_env_map([
        ("JWT_SECRET", ConfigFixtures::SECRET),
        ("COOKIE_NAME", "bad name;"),
    ]);
    assert!(loader.load_from_env().is_err());
}

#[test]
fn test_validate_rejects_code_built_config_at_server_build() {
    let mut config = ConfigFixtures::config();
    config.session.cookie_name = "bad name;".to_string();

    let result = latch_api::ApiServerBuilder::new().config(config).build();
    assert!(matches!(result, Err(latch_api::ApiError::Config(_))));
}

#[test]
fn test_validate_zero_ttl() {
    let loader = ConfigLoader::new().with_env_map([
        ("JWT_SECRET", ConfigFixtures::SECRET),
        ("TOKEN_TTL_SECS", "0"),
    ]);
    assert!(loader.load_from_env().is_err());
}

// =============================================================================
// Wiring
// =============================================================================

#[test]
fn test_wired_loaded_config_drives_codec_and_cookie() {
    let loader = ConfigLoader::new().with_env_map([
        ("JWT_SECRET", ConfigFixtures::SECRET),
        ("COOKIE_NAME", "sid"),
        ("TOKEN_TTL_SECS", "120"),
    ]);
    let config = loader.load_from_env().unwrap();

    let codec = TokenCodec::new(&config.session).unwrap();
    let store = SessionStore::new(&config.session);
    let issued = codec.issue(&UserFixtures::user_identity()).unwrap();

    assert_eq!(issued.claims.exp - issued.claims.iat, 120);
    assert_eq!(store.cookie_name(), "sid");
    assert_eq!(store.max_age(), 120);

    // Same secret from a second load verifies the first load's tokens.
    let reloaded = TokenCodec::new(&loader.load_from_env().unwrap().session).unwrap();
    assert!(reloaded.verify(&issued.token).is_ok());
}

#[test]
fn test_wired_secret_never_in_debug_output() {
    let config = ConfigFixtures::config();
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains(ConfigFixtures::SECRET));

    let codec = TokenCodec::new(&config.session).unwrap();
    assert!(!format!("{:?}", codec).contains(ConfigFixtures::SECRET));
    assert_eq!(codec.verify("x.y.z"), Err(AuthError::InvalidSession));
}
