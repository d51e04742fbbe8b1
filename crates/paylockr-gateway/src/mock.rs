//! Programmable in-process gateway for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use paylockr_core::error::AppError;
use paylockr_core::result::AppResult;

use crate::adapter::{
    GatewayVerification, PaymentGateway, PaymentRequest, PaymentSession, SettlementOutcome,
};

/// Gateway double whose answers are scripted per reference.
///
/// References without a scripted outcome verify as pending, which mirrors
/// a real gateway that has not settled the charge yet.
#[derive(Debug, Default)]
pub struct MockGateway {
    outcomes: Mutex<HashMap<String, SettlementOutcome>>,
    initialized: Mutex<Vec<PaymentRequest>>,
    verify_calls: AtomicUsize,
    fail_initialize: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome `verify` reports for a reference.
    pub fn set_outcome(&self, reference: &str, outcome: SettlementOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(reference.to_string(), outcome);
    }

    /// Make every subsequent `initialize` call fail.
    pub fn fail_initialize(&self) {
        self.fail_initialize.store(true, Ordering::SeqCst);
    }

    /// Requests passed to `initialize`, in call order. Failed attempts
    /// are recorded too.
    pub fn initialized_requests(&self) -> Vec<PaymentRequest> {
        self.initialized.lock().unwrap().clone()
    }

    /// How many times `verify` has been called.
    pub fn verify_call_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initialize(&self, request: &PaymentRequest) -> AppResult<PaymentSession> {
        self.initialized.lock().unwrap().push(request.clone());
        if self.fail_initialize.load(Ordering::SeqCst) {
            return Err(AppError::gateway("Unable to initialize payment"));
        }
        Ok(PaymentSession {
            payment_url: format!("https://checkout.example.test/{}", request.reference),
        })
    }

    async fn verify(&self, reference: &str) -> AppResult<GatewayVerification> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(reference)
            .copied()
            .unwrap_or(SettlementOutcome::Pending);
        Ok(GatewayVerification {
            reference: reference.to_string(),
            outcome,
            gateway_tx_id: match outcome {
                SettlementOutcome::Pending => None,
                _ => Some(format!("gw-{reference}")),
            },
            amount: None,
            currency: None,
        })
    }
}
