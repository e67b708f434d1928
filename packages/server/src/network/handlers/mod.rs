//! HTTP handler definitions for the faultline node.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod route;

pub use health::{health_handler, liveness_handler};
pub use route::route_handler;

use std::sync::Arc;
use std::time::Instant;

use faultline_core::RoutingEngine;

use super::NetworkConfig;
use crate::forward::HttpForwarder;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap. Read-only
/// after startup: concurrent request handlers share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// The routing engine executing faults and downstream fan-out.
    pub engine: Arc<RoutingEngine<HttpForwarder>>,
    /// Network configuration (bind address, CORS origins).
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
