//! sevtrack-api - Bug report intake service
//!
//! Accepts single and batch bug reports, classifies their severity with an
//! external classifier process, and stores the classified records.

use anyhow::{Context, Result};
use clap::Parser;
use sevtrack_api::classifier::SeverityClassifier;
use sevtrack_api::cli::Cli;
use sevtrack_api::store::SqliteBugStore;
use sevtrack_api::{build_router, AppState};
use sevtrack_common::config::{load_config_layer, ServiceConfig};
use sevtrack_common::db::init_database;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let toml = load_config_layer(cli.config.as_deref()).context("Failed to load config file")?;
    let config = ServiceConfig::resolve(cli.overrides(), toml);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("sevtrack_api={},tower_http=debug", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting sevtrack-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let pool = init_database(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Connected to database");

    let classifier = SeverityClassifier::from_config(&config.classifier);
    info!(
        interpreter = %config.classifier.interpreter,
        single_script = %config.classifier.single_script.display(),
        batch_script = %config.classifier.batch_script.display(),
        timeout = ?config.classifier.timeout,
        "Classifier configured"
    );

    let state = AppState::new(Arc::new(SqliteBugStore::new(pool)), classifier);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
