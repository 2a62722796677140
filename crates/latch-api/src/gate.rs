// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request gates.
//!
//! A [`Pipeline`] is an ordered list of [`Gate`]s. Each gate either passes the
//! [`GateContext`] on or halts the request with an [`AuthError`]; the first halt
//! ends the run and no later gate sees the request.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::{authorize, AuthContext, AuthError, Decision, Role, TokenCodec};
use crate::session::SessionStore;

// =============================================================================
// Gate
// =============================================================================

/// State threaded through a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct GateContext {
    /// Identity established by an earlier gate.
    pub auth: Option<AuthContext>,
}

/// Result of a single gate.
#[derive(Debug)]
pub enum Flow {
    /// Hand the context to the next gate.
    Continue(GateContext),
    /// Reject the request.
    Halt(AuthError),
}

/// One step of request admission.
pub trait Gate: Send + Sync {
    /// Gate name for logging.
    fn name(&self) -> &'static str;

    /// Inspects the request headers and the context built so far.
    fn apply(&self, headers: &HeaderMap, ctx: GateContext) -> Flow;
}

// =============================================================================
// Pipeline
// =============================================================================

/// Ordered gates applied to a request.
#[derive(Clone, Default)]
pub struct Pipeline {
    gates: Vec<Arc<dyn Gate>>,
}

impl Pipeline {
    /// Creates an empty pipeline. An empty pipeline admits every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a gate.
    pub fn with_gate(mut self, gate: impl Gate + 'static) -> Self {
        self.gates.push(Arc::new(gate));
        self
    }

    /// Appends a shared gate.
    pub fn with_shared_gate(mut self, gate: Arc<dyn Gate>) -> Self {
        self.gates.push(gate);
        self
    }

    /// Pipeline that requires a valid session.
    pub fn authenticated(codec: Arc<TokenCodec>, store: Arc<SessionStore>) -> Self {
        Self::new().with_gate(AuthenticationGate::new(codec, store))
    }

    /// Pipeline that requires a valid session whose role satisfies `role`.
    pub fn require_role(codec: Arc<TokenCodec>, store: Arc<SessionStore>, role: Role) -> Self {
        Self::authenticated(codec, store).with_gate(RoleGate::new(role))
    }

    /// Returns the gate names in order.
    pub fn gate_names(&self) -> Vec<&'static str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    /// Runs every gate in order, stopping at the first halt.
    pub fn run(&self, headers: &HeaderMap) -> Result<GateContext, AuthError> {
        let mut ctx = GateContext::default();
        for gate in &self.gates {
            match gate.apply(headers, ctx) {
                Flow::Continue(next) => ctx = next,
                Flow::Halt(err) => {
                    tracing::debug!(gate = gate.name(), kind = err.kind(), "Request halted");
                    return Err(err);
                }
            }
        }
        Ok(ctx)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("gates", &self.gate_names())
            .finish()
    }
}

// =============================================================================
// AuthenticationGate
// =============================================================================

/// Restores the identity from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthenticationGate {
    codec: Arc<TokenCodec>,
    store: Arc<SessionStore>,
}

impl AuthenticationGate {
    /// Creates a new authentication gate.
    pub fn new(codec: Arc<TokenCodec>, store: Arc<SessionStore>) -> Self {
        Self { codec, store }
    }
}

impl Gate for AuthenticationGate {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn apply(&self, headers: &HeaderMap, mut ctx: GateContext) -> Flow {
        let Some(token) = self.store.extract(headers) else {
            return Flow::Halt(AuthError::NoSession);
        };

        match self.codec.verify(&token) {
            Ok(claims) => {
                ctx.auth = Some(AuthContext::from_claims(&claims));
                Flow::Continue(ctx)
            }
            Err(err) => Flow::Halt(err),
        }
    }
}

// =============================================================================
// RoleGate
// =============================================================================

/// Requires the established identity to satisfy a role.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    required: Role,
}

impl RoleGate {
    /// Creates a gate requiring `required`.
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

impl Gate for RoleGate {
    fn name(&self) -> &'static str {
        "role"
    }

    fn apply(&self, _headers: &HeaderMap, ctx: GateContext) -> Flow {
        let Some(identity) = ctx.auth.as_ref() else {
            return Flow::Halt(AuthError::NoSession);
        };

        match authorize(identity, self.required) {
            Decision::Allow => Flow::Continue(ctx),
            Decision::Deny(err) => Flow::Halt(err),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
