// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Latch Integration Tests
//!
//! Cross-crate tests for the Latch session layer and the shared helpers they
//! use.
//!
//! - [`common`]: fixtures, the [`TestApp`](common::harness::TestApp) harness
//!   and response assertions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p latch-tests
//! cargo test -p latch-tests --test integration_session
//! ```
//!
//! ## Test Suites
//!
//! - `integration_auth.rs`: token codec, policy and gate pipeline wired together
//! - `integration_session.rs`: login, gated access and logout over the router
//! - `integration_api.rs`: registration, error bodies, route surface
//! - `integration_config.rs`: file formats, placeholders and overrides
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use latch_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let mut agent = app.agent();
//!     agent.register(&UserFixtures::alice()).await;
//!     agent.login(UserFixtures::ALICE_EMAIL, UserFixtures::PASSWORD).await;
//!     agent.get("/api/v1/users/protected").await.assert_status(200);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
}
