//! Route definitions for the PayLockr HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use paylockr_core::config::server::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(payment_routes())
        .merge(webhook_routes())
        .merge(download_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Link lookup, checkout, and verification.
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/pay/{code}", get(handlers::link::lookup))
        .route("/pay/{code}/checkout", post(handlers::payment::checkout))
        .route(
            "/payments/verify/{reference}",
            get(handlers::payment::verify),
        )
}

/// Gateway webhook delivery.
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/flutterwave", post(handlers::webhook::flutterwave))
}

/// Download grant issuance and redemption.
fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/downloads", post(handlers::download::issue))
        .route("/downloads/{token}", get(handlers::download::redeem))
}

/// Liveness.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
