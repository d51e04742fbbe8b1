//! Integration tests for webhook settlement and verification polling.

mod common;

use http::StatusCode;

use common::{TestApp, sample_link};
use paylockr_gateway::SettlementOutcome;

#[tokio::test]
async fn test_webhook_completes_pending_transaction() {
    let app = TestApp::new().await;
    app.seed_link(sample_link()).await;
    let (reference, _) = app.open_checkout("abc123").await;

    let response = app.deliver_webhook(&reference, "successful").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "processed");

    let verify = app
        .request("GET", &format!("/api/payments/verify/{reference}"), None)
        .await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["data"]["status"], "completed");
}

#[tokio::test]
async fn test_duplicate_webhook_delivery_is_absorbed() {
    let app = TestApp::new().await;
    app.seed_link(sample_link()).await;
    let (reference, _) = app.open_checkout("abc123").await;

    let first = app.deliver_webhook(&reference, "successful").await;
    assert_eq!(first.status, StatusCode::OK);

    // The retry gets a 200 so the gateway stops redelivering.
    let second = app.deliver_webhook(&reference, "successful").await;
    assert_eq!(second.status, StatusCode::OK);

    // A conflicting late delivery cannot flip the terminal state.
    let conflicting = app.deliver_webhook(&reference, "failed").await;
    assert_eq!(conflicting.status, StatusCode::OK);
    assert_eq!(conflicting.body["data"]["message"], "ignored");

    let verify = app
        .request("GET", &format!("/api/payments/verify/{reference}"), None)
        .await;
    assert_eq!(verify.body["data"]["status"], "completed");
}

#[tokio::test]
async fn test_webhook_with_bad_signature_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            "POST",
            "/api/webhooks/flutterwave",
            Some(serde_json::json!({
                "event": "charge.completed",
                "data": {"tx_ref": "tx_1", "status": "successful"}
            })),
            &[("verif-hash", "wrong-hash")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_for_unknown_reference_is_acknowledged() {
    let app = TestApp::new().await;
    let response = app.deliver_webhook("tx_unknown", "successful").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "ignored");
}

#[tokio::test]
async fn test_verify_polls_the_gateway_to_completion() {
    let app = TestApp::new().await;
    app.seed_link(sample_link()).await;
    let (reference, _) = app.open_checkout("abc123").await;
    app.gateway
        .set_outcome(&reference, SettlementOutcome::Successful);

    let response = app
        .request("GET", &format!("/api/payments/verify/{reference}"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["status"], "completed");
    assert_eq!(data["charged_amount"], "43.78");
    assert_eq!(data["charged_currency"], "EUR");
    assert_eq!(app.gateway.verify_call_count(), 1);
}

#[tokio::test]
async fn test_verify_times_out_while_gateway_reports_pending() {
    let app = TestApp::new().await;
    app.seed_link(sample_link()).await;
    let (reference, _) = app.open_checkout("abc123").await;

    let response = app
        .request("GET", &format!("/api/payments/verify/{reference}"), None)
        .await;

    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.body["error"], "VERIFICATION_TIMEOUT");
    assert_eq!(app.gateway.verify_call_count(), 5);

    // Still pending, never failed by the poller.
    let webhook = app.deliver_webhook(&reference, "successful").await;
    assert_eq!(webhook.body["data"]["message"], "processed");
}

#[tokio::test]
async fn test_verify_unknown_reference_is_404() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/payments/verify/tx_unknown", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
