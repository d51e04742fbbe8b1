//! Flutterwave HTTP client.
//!
//! Speaks the v3 API: `POST /payments` to open a hosted session and
//! `GET /transactions/verify_by_reference` to resolve a tx_ref.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use paylockr_core::config::gateway::GatewayConfig;
use paylockr_core::error::{AppError, ErrorKind};
use paylockr_core::result::AppResult;
use paylockr_core::types::Currency;

use crate::adapter::{
    GatewayVerification, PaymentGateway, PaymentRequest, PaymentSession, SettlementOutcome,
};

/// Production gateway client for Flutterwave.
#[derive(Debug, Clone)]
pub struct FlutterwaveGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
    redirect_url: String,
}

/// `POST /payments` request body.
#[derive(Debug, Serialize)]
struct InitializeBody<'a> {
    tx_ref: &'a str,
    amount: Decimal,
    currency: &'a str,
    redirect_url: &'a str,
    customer: CustomerBody<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customizations: Option<CustomizationsBody<'a>>,
}

#[derive(Debug, Serialize)]
struct CustomerBody<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CustomizationsBody<'a> {
    title: &'a str,
}

/// Envelope every Flutterwave response uses.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    link: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    id: Option<i64>,
    tx_ref: String,
    status: String,
    amount: Option<Decimal>,
    currency: Option<String>,
}

impl FlutterwaveGateway {
    /// Create a client from configuration.
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            redirect_url: config.redirect_url.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for FlutterwaveGateway {
    async fn initialize(&self, request: &PaymentRequest) -> AppResult<PaymentSession> {
        let body = InitializeBody {
            tx_ref: &request.reference,
            amount: request.amount,
            currency: request.currency.code(),
            redirect_url: &self.redirect_url,
            customer: CustomerBody {
                email: &request.customer_email,
                name: request.customer_name.as_deref(),
            },
            customizations: request
                .description
                .as_deref()
                .map(|title| CustomizationsBody { title }),
        };

        let response = self
            .client
            .post(format!("{}/payments", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Gateway, "Payment initialization failed", e)
            })?;

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                reference = %request.reference,
                "Gateway rejected payment initialization"
            );
            return Err(AppError::gateway("Unable to initialize payment"));
        }

        let envelope: Envelope<InitializeData> = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Gateway, "Invalid gateway response", e)
        })?;

        let data = match (envelope.status.as_str(), envelope.data) {
            ("success", Some(data)) => data,
            _ => {
                warn!(
                    message = envelope.message.as_deref().unwrap_or("none"),
                    reference = %request.reference,
                    "Gateway returned unsuccessful initialization"
                );
                return Err(AppError::gateway("Unable to initialize payment"));
            }
        };

        info!(reference = %request.reference, "Payment session initialized");
        Ok(PaymentSession {
            payment_url: data.link,
        })
    }

    async fn verify(&self, reference: &str) -> AppResult<GatewayVerification> {
        let response = self
            .client
            .get(format!(
                "{}/transactions/verify_by_reference",
                self.base_url
            ))
            .query(&[("tx_ref", reference)])
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Gateway, "Payment verification failed", e)
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            // The gateway has not seen the charge yet; treat as pending.
            return Ok(GatewayVerification {
                reference: reference.to_string(),
                outcome: SettlementOutcome::Pending,
                gateway_tx_id: None,
                amount: None,
                currency: None,
            });
        }

        if !response.status().is_success() {
            return Err(AppError::gateway(format!(
                "Gateway verification returned HTTP {}",
                response.status()
            )));
        }

        let envelope: Envelope<VerifyData> = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Gateway, "Invalid gateway response", e)
        })?;

        let data = envelope
            .data
            .ok_or_else(|| AppError::gateway("Gateway verification returned no data"))?;

        Ok(GatewayVerification {
            reference: data.tx_ref,
            outcome: parse_outcome(&data.status),
            gateway_tx_id: data.id.map(|id| id.to_string()),
            amount: data.amount,
            currency: data
                .currency
                .as_deref()
                .and_then(|c| Currency::from_str(c).ok()),
        })
    }
}

/// Map the gateway's free-form status string onto a settlement outcome.
/// Anything unrecognized is treated as still pending rather than failed.
fn parse_outcome(status: &str) -> SettlementOutcome {
    match status {
        "successful" => SettlementOutcome::Successful,
        "failed" | "cancelled" => SettlementOutcome::Failed,
        _ => SettlementOutcome::Pending,
    }
}
