//! Checkout and verification handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use paylockr_core::error::AppError;

use crate::dto::request::CheckoutRequest;
use crate::dto::response::{ApiResponse, CheckoutResponse, TransactionResponse, VerifyResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/pay/{code}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<CheckoutResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state
        .checkout
        .checkout(
            &code,
            &paylockr_service::CheckoutRequest {
                customer_email: req.customer_email,
                customer_name: req.customer_name,
                currency: req.currency,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(CheckoutResponse {
        payment_url: session.payment_url,
        reference: session.transaction.external_reference.clone(),
        transaction: TransactionResponse::from(&session.transaction),
    })))
}

/// GET /api/payments/verify/{reference}
pub async fn verify(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ApiResponse<VerifyResponse>>, ApiError> {
    let transaction = state.verification.verify(&reference).await?;

    Ok(Json(ApiResponse::ok(VerifyResponse {
        status: transaction.status,
        charged_amount: transaction.charged_amount,
        charged_currency: transaction.charged_currency,
        transaction: TransactionResponse::from(&transaction),
    })))
}
