//! # paylockr-gateway
//!
//! Boundary to the external payment gateway. The gateway is consumed as
//! an opaque hosted service: we initialize a payment session, redirect
//! the buyer, and later learn the outcome from a webhook or a
//! verify-by-reference call. Everything behind the [`PaymentGateway`]
//! trait; the Flutterwave client is the production implementation and
//! [`mock::MockGateway`] stands in for tests.

pub mod adapter;
pub mod flutterwave;
pub mod mock;
pub mod webhook;

pub use adapter::{
    GatewayVerification, PaymentGateway, PaymentRequest, PaymentSession, SettlementOutcome,
};
pub use flutterwave::FlutterwaveGateway;
