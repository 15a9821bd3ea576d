use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use connected_office_api::config::{self, AppConfig};
use connected_office_api::database::{schema, DatabaseManager};
use connected_office_api::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "connected-office-api", version, about = "Connected Office REST API server")]
struct Args {
    /// Port to listen on (overrides OFFICE_API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// YAML configuration file; environment variables still take precedence
    #[arg(short, long, env = "OFFICE_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => config::config().clone(),
    };
    if let Some(port) = args.port {
        config.api.port = port;
    }

    info!("Starting Connected Office API in {:?} mode", config.environment);

    let database = DatabaseManager::connect(&config.database).context("failed to create database pool")?;
    if config.database.bootstrap_schema {
        // The server still starts; /health reports the database as unavailable
        if let Err(e) = schema::bootstrap(database.pool()).await {
            warn!("Schema bootstrap failed: {}", e);
        }
    }

    let state = AppState::from_database(&database, &config).context("invalid security configuration")?;
    let app = server::app(state, &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Connected Office API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
