//! # paylockr-service
//!
//! The redemption pipeline's business logic. Each service owns one stage:
//! link resolution, the transaction ledger, checkout orchestration,
//! settlement verification, and download grant issuance. Services talk to
//! persistence through the store traits and to the payment gateway through
//! the [`paylockr_gateway::PaymentGateway`] trait, so every stage runs
//! unchanged against the in-memory backend in tests.

pub mod checkout;
pub mod grant;
pub mod ledger;
pub mod resolver;
pub mod token;
pub mod verify;

#[cfg(test)]
pub(crate) mod testutil;

pub use checkout::{CheckoutRequest, CheckoutService, CheckoutSession};
pub use grant::GrantIssuer;
pub use ledger::TransactionLedger;
pub use resolver::{LinkResolver, ResolvedLink};
pub use verify::{VerificationController, VerifyPolicy};
