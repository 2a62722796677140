// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness check
//! - [`users`]: registration, sessions and gated user resources

mod health;
mod users;

pub use health::*;
pub use users::*;
