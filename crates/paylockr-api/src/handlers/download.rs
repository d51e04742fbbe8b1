//! Download grant handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use paylockr_core::error::AppError;
use paylockr_core::types::TransactionId;

use crate::dto::request::DownloadRequest;
use crate::dto::response::{ApiResponse, DownloadResponse, RedeemResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/downloads
pub async fn issue(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<Json<ApiResponse<DownloadResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let transaction_id = TransactionId::from(req.transaction_id);
    let grant = state
        .grants
        .issue(transaction_id, &req.customer_email)
        .await?;

    // Preconditions in `issue` guarantee the transaction and file exist.
    let transaction = state
        .stores
        .transactions
        .find_by_id(transaction_id)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    let file = state
        .stores
        .files
        .find_by_id(transaction.file_id)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    Ok(Json(ApiResponse::ok(DownloadResponse {
        download_url: grant.url,
        file_name: file.title,
        expires_at: grant.expires_at,
    })))
}

/// GET /api/downloads/{token}
pub async fn redeem(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<RedeemResponse>>, ApiError> {
    let (file, _grant) = state.grants.redeem(&token).await?;

    Ok(Json(ApiResponse::ok(RedeemResponse {
        file_name: file.title,
        file_type: file.file_type,
        storage_path: file.storage_path,
    })))
}
