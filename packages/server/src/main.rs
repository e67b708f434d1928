//! Faultline node binary: parse configuration, start the server, run until
//! interrupted.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use faultline_core::RoutingEngine;
use faultline_server::{HttpForwarder, NetworkConfig, NetworkModule};

/// A fault-injection node for building synthetic service topologies.
#[derive(Debug, Parser)]
#[command(name = "faultline", version)]
struct Cli {
    /// The name set on every response this node produces.
    #[arg(long, env = "SERVICE_NAME", default_value = "Undefined")]
    service_name: String,

    /// Bind address for the HTTP server.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let forwarder = Arc::new(HttpForwarder::new());
    let engine = Arc::new(RoutingEngine::new(cli.service_name.clone(), forwarder));

    let config = NetworkConfig {
        host: cli.host,
        port: cli.port,
        ..NetworkConfig::default()
    };

    let mut module = NetworkModule::new(config, engine);
    let port = module.start().await?;

    info!(service = %cli.service_name, port, "faultline node listening");

    // Detached memory-leak tasks are daemon-style: shutdown does not wait
    // for them.
    module
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
}
