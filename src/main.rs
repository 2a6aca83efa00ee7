//! Failover Relay
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 FAILOVER RELAY                 │
//!   Client Request       │  ┌─────────┐   ┌──────────┐   ┌────────────┐  │
//!   ─────────────────────┼─▶│  http   │──▶│ handlers │──▶│   relay    │──┼──▶ host (pinned)
//!                        │  │ server  │   │ validate │   │  failover  │──┼──▶ host 2
//!                        │  └────┬────┘   └──────────┘   └─────┬──────┘──┼──▶ host 3
//!                        │       │ GET /*                      │         │
//!                        │       ▼                             ▼         │
//!                        │  ┌─────────┐                 ┌────────────┐   │
//!                        │  │ static  │                 │  upstream  │   │
//!                        │  │  files  │                 │  HostPool  │   │
//!                        │  └─────────┘                 └────────────┘   │
//!                        │                                               │
//!                        │  config · observability · lifecycle           │
//!                        └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use failover_relay::config::loader::resolve_config;
use failover_relay::observability::{logging, metrics};
use failover_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "failover-relay")]
#[command(about = "Relay API calls across redundant upstream hosts", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port, overriding the configured bind address port.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.port)?;

    logging::init_logging(&config.observability);

    tracing::info!("failover-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_hosts = ?config.upstream.base_urls,
        attempt_timeout_secs = config.timeouts.attempt_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
