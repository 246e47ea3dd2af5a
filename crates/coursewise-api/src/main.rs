//! Coursewise REST API entry point.
//!
//! Binary name: `cwise`
//!
//! Parses CLI arguments, loads configuration and the course catalog,
//! builds the vector index, then serves the HTTP API.

mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "cwise", about = "Course recommendation chat service", version)]
struct Cli {
    /// Host to bind to (overrides config file).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config file).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Path to the course catalog JSON (overrides config file).
    #[arg(long)]
    catalog: Option<String>,

    /// Increase logging verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "info,coursewise=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let mut config = coursewise_infra::config::load_config(&cli.config).await;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog.path = catalog;
    }

    let api_key = coursewise_infra::config::bedrock_api_key_from_env().ok_or_else(|| {
        anyhow::anyhow!(
            "no Bedrock API key found; set COURSEWISE_BEDROCK_API_KEY or AWS_BEARER_TOKEN_BEDROCK"
        )
    })?;

    let state = AppState::init(&config, api_key).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Coursewise API listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
