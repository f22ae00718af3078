//! waltid-router
//!
//! Sits in front of the wallet, issuer, verifier and portal services and
//! rewrites each request's destination from its virtual-port header.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 ROUTER                       │
//!     Client Request       │  ┌─────────┐    ┌──────────────┐             │
//!     ─────────────────────┼─▶│  http   │───▶│   routing    │             │
//!     X-Target-Port: 7101  │  │ server  │    │ RouteTable   │             │
//!                          │  └────┬────┘    └──────┬───────┘             │
//!                          │       │   Forward(t) / NoRoute               │
//!                          │       ▼◀──────────────┘                      │
//!                          │  ┌─────────┐                                 │
//!     ◀────────────────────┼──│ client  │◀───────────────────────────────┼──── Backend
//!                          │  └─────────┘                                 │
//!                          │  config · observability · lifecycle          │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use waltid_router::config::{
    load_config, validation::validate_config, ConfigError, EnvOverride, LoadedConfig,
};
use waltid_router::lifecycle::signals::shutdown_on_signal;
use waltid_router::observability::{logging, metrics};
use waltid_router::{HttpServer, RouteTable, Shutdown};

#[derive(Parser)]
#[command(name = "waltid-router")]
#[command(
    about = "Routes requests to backend services by virtual port and path",
    long_about = None
)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Print the route table as JSON and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let LoadedConfig {
        mut config,
        overrides,
    } = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    let table = RouteTable::build(&config.routing.policy_specs())?;

    if cli.print_routes {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    logging::init(&config.observability);
    tracing::info!("waltid-router v{} starting", env!("CARGO_PKG_VERSION"));
    for EnvOverride { var, value } in &overrides {
        tracing::info!(var, value = %value, "Port override from environment");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_in_flight = config.listener.max_in_flight,
        request_timeout_secs = config.timeouts.request_secs,
        policies = table.len(),
        "Configuration loaded"
    );
    for key in table.keys() {
        if let Some(policy) = table.policy(key) {
            tracing::info!(
                key,
                rules = policy.rules().len(),
                fallback = %policy.default_target(),
                "Route policy"
            );
        }
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
            metrics::record_route_table(table.len());
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    let server = HttpServer::new(config, Arc::new(table))?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
