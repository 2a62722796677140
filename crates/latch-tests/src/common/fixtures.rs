// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built configurations, users and identities.

use std::sync::Arc;

use argon2::Params;
use latch_api::{Identity, InMemoryUserService, NewUser, Role, SessionStore, TokenCodec};
use latch_config::{LatchConfig, SessionConfig, UsersConfig};

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing service configurations.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A signing secret of exactly the minimum length.
    pub const SECRET: &'static str = "0123456789abcdef0123456789abcdef";

    /// A different secret of valid length.
    pub const OTHER_SECRET: &'static str = "fedcba9876543210fedcba9876543210";

    /// Session settings with [`Self::SECRET`].
    pub fn session() -> SessionConfig {
        SessionConfig::with_secret(Self::SECRET)
    }

    /// A valid configuration with `admin@example.com` as the only admin.
    pub fn config() -> LatchConfig {
        LatchConfig {
            session: Self::session(),
            users: UsersConfig {
                admin_emails: vec![UserFixtures::ADMIN_EMAIL.to_string()],
            },
            ..Default::default()
        }
    }

    /// A token codec over [`Self::session`].
    pub fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(&Self::session()).expect("fixture session is valid"))
    }

    /// A session store over [`Self::session`].
    pub fn store() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(&Self::session()))
    }
}

// =============================================================================
// User Fixtures
// =============================================================================

/// Fixture providing users and identities.
pub struct UserFixtures;

impl UserFixtures {
    /// Password shared by every fixture user.
    pub const PASSWORD: &'static str = "correct horse battery";

    /// Email of the regular fixture user.
    pub const ALICE_EMAIL: &'static str = "alice@example.com";

    /// Email configured as admin in [`ConfigFixtures::config`].
    pub const ADMIN_EMAIL: &'static str = "admin@example.com";

    /// A regular user.
    pub fn alice() -> NewUser {
        Self::new_user("Alice", "Liddell", Self::ALICE_EMAIL)
    }

    /// The configured admin.
    pub fn admin() -> NewUser {
        Self::new_user("Ada", "Admin", Self::ADMIN_EMAIL)
    }

    /// A user with the fixture password.
    pub fn new_user(first_name: &str, last_name: &str, email: &str) -> NewUser {
        NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: Self::PASSWORD.to_string(),
        }
    }

    /// A user-role identity.
    pub fn user_identity() -> Identity {
        Identity::new("user-001", Self::ALICE_EMAIL, Role::User)
    }

    /// An admin-role identity.
    pub fn admin_identity() -> Identity {
        Identity::new("admin-001", Self::ADMIN_EMAIL, Role::Admin)
    }

    /// A user directory with cheap hashing and the fixture admin configured.
    pub fn directory() -> InMemoryUserService {
        let params = Params::new(8, 1, 1, None).expect("valid argon2 params");
        InMemoryUserService::new([Self::ADMIN_EMAIL]).with_argon2_params(params)
    }
}
