//! Flutterwave webhook handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::{info, warn};

use paylockr_core::error::ErrorKind;
use paylockr_gateway::webhook::{self, WebhookEvent};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/webhooks/flutterwave
///
/// Signature check first; after that the handler always answers 200 so
/// the gateway stops retrying. Replays and out-of-order deliveries are
/// absorbed by the ledger's conditional transition.
pub async fn flutterwave(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let signature = headers
        .get(webhook::SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    webhook::verify_signature(signature, &state.config.gateway.webhook_hash)?;

    let verification = WebhookEvent::parse(&body)?.into_verification();
    let reference = verification.reference.clone();

    let message = match state.ledger.apply_verification(&verification).await {
        Ok(Some(settled)) => {
            info!(reference, status = ?settled.status, "Webhook settled transaction");
            "processed"
        }
        Ok(None) => "ignored",
        Err(err) if err.kind == ErrorKind::NotFound => {
            warn!(reference, "Webhook for unknown transaction reference");
            "ignored"
        }
        Err(err) if err.kind == ErrorKind::InvalidTransition => {
            warn!(reference, error = %err, "Webhook conflicts with settled transaction");
            "ignored"
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: message.to_string(),
    })))
}
