//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Liveness plus store connectivity: a cheap read against the link store
/// reports whether the configured backend is reachable.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store_status = match state.stores.links.find_active_by_code("health").await {
        Ok(_) => "connected",
        Err(err) => {
            warn!(error = %err, "Store health probe failed");
            "unavailable"
        }
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if store_status == "connected" {
            "ok"
        } else {
            "degraded"
        }
        .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store_backend: state.config.store.backend.clone(),
        store_status: store_status.to_string(),
    }))
}
