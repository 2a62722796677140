// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Session token issuance and verification
//! - Role ordering and the authorization decision
//! - The per-request authentication context

mod claims;
mod codec;
mod context;
mod error;
pub mod policy;
mod role;

pub use claims::{Claims, Identity, IdentityClaim};
pub use codec::{IssuedToken, TokenCodec};
pub use context::AuthContext;
pub use error::AuthError;
pub use policy::{authorize, Decision};
pub use role::Role;
