// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Tower adapter for gate pipelines.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::{Role, TokenCodec};
use crate::error::ApiError;
use crate::gate::Pipeline;
use crate::session::SessionStore;

// =============================================================================
// GateLayer
// =============================================================================

/// Layer that runs a [`Pipeline`] before the wrapped service.
///
/// On success the established `AuthContext` is placed in the request
/// extensions. On a halt the wrapped service is never called and the client
/// gets the 401 error body.
#[derive(Clone, Debug)]
pub struct GateLayer {
    pipeline: Arc<Pipeline>,
}

impl GateLayer {
    /// Creates a layer from an explicit pipeline.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Requires a valid session.
    pub fn authenticated(codec: Arc<TokenCodec>, store: Arc<SessionStore>) -> Self {
        Self::new(Pipeline::authenticated(codec, store))
    }

    /// Requires a valid session with a role that satisfies `role`.
    pub fn require_role(codec: Arc<TokenCodec>, store: Arc<SessionStore>, role: Role) -> Self {
        Self::new(Pipeline::require_role(codec, store, role))
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            pipeline: self.pipeline.clone(),
        }
    }
}

// =============================================================================
// GateMiddleware
// =============================================================================

/// Middleware produced by [`GateLayer`].
#[derive(Clone, Debug)]
pub struct GateMiddleware<S> {
    inner: S,
    pipeline: Arc<Pipeline>,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let outcome = self.pipeline.run(req.headers());

        // Take the service that was driven to readiness and leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let ctx = match outcome {
                Ok(ctx) => ctx,
                Err(err) => return Ok(ApiError::from(err).into_response()),
            };

            if let Some(auth) = ctx.auth {
                let client_ip = req
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ci| ci.0.ip());

                let mut auth = auth.with_request_id(Uuid::now_v7());
                if let Some(ip) = client_ip {
                    auth = auth.with_client_ip(ip);
                }

                tracing::debug!(
                    user_id = %auth.user_id,
                    role = %auth.role,
                    request_id = %auth.request_id,
                    "Session verified"
                );
                req.extensions_mut().insert(auth);
            }

            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
