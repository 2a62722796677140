// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`GateLayer`]: runs a session gate pipeline in front of a route

mod gate;

pub use gate::{GateLayer, GateMiddleware};
