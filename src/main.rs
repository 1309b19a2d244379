//! Auth service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ error pipeline layer ─▶ router
//!                                                  ▲                   │
//!                                                  │         ┌─────────┴──────────┐
//!                                                  │         │ /register, /login  │
//!                                                  │         │  validation gate ──┼──▶ 422
//!                                                  │         │  handler ──────────┼──▶ 200
//!                                                  │         ├────────────────────┤
//!                                                  │         │ /panic/*, fallback │
//!                                                  └─────────┤  Err(Failure)      │
//!                                                            └────────────────────┘
//!
//!     Error pipeline: logging → alerting → classification (404) → default (500)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use auth_service::http::HttpServer;
use auth_service::lifecycle::{signals, startup, Shutdown};
use auth_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "auth-service")]
#[command(about = "Registration and login service with an ordered error pipeline", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = auth_service::config::load(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("auth-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        alerts_enabled = config.alerts.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let collaborators = startup::collaborators(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config, collaborators);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
