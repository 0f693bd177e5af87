//! Switchboard entry point.
//!
//! Binary name: `switchboard`
//!
//! Loads `.env` and config, sets up tracing, then either starts the HTTP
//! server or validates the configuration.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;

use switchboard_infra::config::{load_config, read_config, resolve_data_dir};
use switchboard_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use switchboard_types::config::AppConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: cli.default_filter().to_string(),
        json: cli.json_logs,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();

    let result = match cli.command {
        Some(Commands::CheckConfig) => check_config(cli.config.as_deref(), &data_dir).await,
        Some(Commands::Serve { port, host }) => {
            let config = load_config(cli.config.as_deref(), &data_dir).await;
            serve(config, &data_dir, host, port).await
        }
        None => {
            let config = load_config(cli.config.as_deref(), &data_dir).await;
            serve(config, &data_dir, None, None).await
        }
    };

    shutdown_tracing();
    result
}

async fn serve(
    mut config: AppConfig,
    data_dir: &std::path::Path,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::init(config, data_dir).await?;
    let router = http::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, data_dir = %data_dir.display(), "switchboard listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Strict when a path is given: a broken file is an error, not a warning.
async fn check_config(
    path: Option<&std::path::Path>,
    data_dir: &std::path::Path,
) -> anyhow::Result<()> {
    let config = match path {
        Some(path) => read_config(path).await?,
        None => load_config(None, data_dir).await,
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
