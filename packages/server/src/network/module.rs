//! Network module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` creates resources,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. The split lets callers (and tests) learn the actual bound
//! port before any traffic flows.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use faultline_core::RoutingEngine;

use super::config::NetworkConfig;
use super::handlers::{health_handler, liveness_handler, route_handler, AppState};
use super::middleware::build_http_layers;
use crate::forward::HttpForwarder;

/// Manages the full HTTP server lifecycle of one faultline node.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- bundles configuration and the routing engine
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future fires
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, engine: Arc<RoutingEngine<HttpForwarder>>) -> Self {
        let state = AppState {
            engine,
            config: Arc::new(config.clone()),
            start_time: Instant::now(),
        };
        Self {
            config,
            listener: None,
            state,
        }
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `POST /` -- the routing endpoint
    /// - `GET /health` -- node identity and uptime JSON
    /// - `GET /health/live` -- liveness probe
    #[must_use]
    pub fn build_router(&self) -> Router {
        let layers = build_http_layers(&self.config);

        Router::new()
            .route("/", post(route_handler))
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .layer(layers)
            .with_state(self.state.clone())
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the shutdown future fires.
    ///
    /// Graceful for in-flight requests only: detached memory-leak tasks are
    /// daemon-style and are never waited for at shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a fatal I/O error.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        // Build the router before taking the listener out of self.
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
