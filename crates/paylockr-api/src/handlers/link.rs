//! Payment link lookup handler.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::response::{ApiResponse, LinkLookupResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/pay/{code}
pub async fn lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<LinkLookupResponse>>, ApiError> {
    let resolved = state.resolver.resolve(&code).await?;
    Ok(Json(ApiResponse::ok(LinkLookupResponse::from_parts(
        &resolved.link,
        &resolved.file,
    ))))
}
