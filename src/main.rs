//! PayLockr server: payment link redemption and settlement.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use paylockr_api::{build_router, build_state};
use paylockr_core::config::AppConfig;
use paylockr_core::error::AppError;
use paylockr_database::stores::Stores;
use paylockr_gateway::{FlutterwaveGateway, PaymentGateway};
use paylockr_rates::cache::RateCache;
use paylockr_rates::fetcher::HttpRateFetcher;

#[tokio::main]
async fn main() {
    let env = std::env::var("PAYLOCKR_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => fmt().with_env_filter(filter).json().init(),
        _ => fmt().with_env_filter(filter).init(),
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PayLockr server...");

    let stores = Stores::connect(&config.store).await?;

    let fetcher = Arc::new(HttpRateFetcher::new(&config.rates)?);
    let rates = RateCache::from_config(fetcher, &config.rates);

    let gateway: Arc<dyn PaymentGateway> = Arc::new(FlutterwaveGateway::new(&config.gateway)?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config, stores, rates, gateway, shutdown_rx);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "PayLockr server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for SIGINT/SIGTERM, then broadcast shutdown to in-flight work.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
}
