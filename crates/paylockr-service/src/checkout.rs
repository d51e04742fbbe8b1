//! Checkout orchestration: resolve, price, record, hand off to the gateway.

use std::sync::Arc;

use tracing::{info, warn};

use paylockr_core::result::AppResult;
use paylockr_core::types::{Currency, PlanTier};
use paylockr_database::stores::SellerStore;
use paylockr_entity::{NewTransaction, Transaction};
use paylockr_gateway::{PaymentGateway, PaymentRequest};
use paylockr_rates::pricing::PricingEngine;

use crate::ledger::TransactionLedger;
use crate::resolver::LinkResolver;
use crate::token;

/// What the buyer submits at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_email: String,
    pub customer_name: Option<String>,
    /// Currency the buyer wants to pay in.
    pub currency: Currency,
}

/// An opened checkout: the pending transaction plus the gateway redirect.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub payment_url: String,
    pub transaction: Transaction,
}

/// Runs the redemption pipeline up to the gateway handoff.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    resolver: LinkResolver,
    ledger: TransactionLedger,
    sellers: Arc<dyn SellerStore>,
    pricing: PricingEngine,
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutService {
    pub fn new(
        resolver: LinkResolver,
        ledger: TransactionLedger,
        sellers: Arc<dyn SellerStore>,
        pricing: PricingEngine,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            resolver,
            ledger,
            sellers,
            pricing,
            gateway,
        }
    }

    /// Open a checkout for a link code.
    ///
    /// The exchange rate and amounts are snapshotted into the pending
    /// transaction before the gateway is contacted; a gateway failure
    /// marks the transaction failed rather than leaving it dangling.
    pub async fn checkout(
        &self,
        code: &str,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSession> {
        let resolved = self.resolver.resolve(code).await?;
        let link = &resolved.link;
        let file = &resolved.file;

        // An orphaned seller row should not block the sale; price it at
        // the default tier.
        let plan = match self.sellers.find_by_id(link.seller_id).await? {
            Some(seller) => seller.plan,
            None => {
                warn!(seller_id = %link.seller_id, "Seller not found, pricing at default tier");
                PlanTier::default()
            }
        };

        let base_amount = link.effective_price(file.price);
        let quote = self
            .pricing
            .price(base_amount, Currency::Usd, request.currency, plan)
            .await;

        let reference = token::generate_reference();
        let transaction = self
            .ledger
            .create_pending(&NewTransaction {
                payment_link_id: link.id,
                file_id: file.id,
                seller_id: link.seller_id,
                base_amount,
                base_currency: Currency::Usd,
                charged_amount: quote.total_amount,
                charged_currency: request.currency,
                exchange_rate: quote.exchange_rate,
                fee_amount: quote.fee_amount,
                net_amount: quote.converted_amount,
                external_reference: reference.clone(),
                customer_email: request.customer_email.clone(),
                customer_name: request.customer_name.clone(),
            })
            .await?;

        let session = self
            .gateway
            .initialize(&PaymentRequest {
                reference: reference.clone(),
                amount: quote.total_amount,
                currency: request.currency,
                customer_email: request.customer_email.clone(),
                customer_name: request.customer_name.clone(),
                description: Some(file.title.clone()),
            })
            .await;

        let session = match session {
            Ok(session) => session,
            Err(err) => {
                if let Err(settle_err) = self.ledger.mark_failed(&reference).await {
                    warn!(
                        reference,
                        error = %settle_err,
                        "Could not mark transaction failed after gateway error"
                    );
                }
                return Err(err);
            }
        };

        info!(
            reference,
            code,
            charged = %transaction.charged_amount,
            currency = %request.currency,
            "Checkout opened"
        );
        Ok(CheckoutSession {
            payment_url: session.payment_url,
            transaction,
        })
    }
}
