//! Hosted checkout-session creation.
//!
//! [`BillingProvider`] is the seam between the registration service and the
//! processor: handlers depend on the trait, production wires in
//! [`StripeBilling`], integration tests wire in a mock.

use std::collections::HashMap;

use async_trait::async_trait;
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionLineItemsPriceDataRecurring,
    CreateCheckoutSessionLineItemsPriceDataRecurringInterval, Currency,
};

use crate::error::{PaymentError, Result};

/// Everything needed to open one subscription checkout bound to one
/// registration.
///
/// `reference_id` is the registration id and is the ONLY correlation carried
/// through the processor: the settlement webhook echoes it back as
/// `client_reference_id`.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub reference_id: String,
    /// Product name shown on the hosted page, e.g. `"Harborview FC Membership"`.
    pub product_name: String,
    /// Line-item description, e.g. `"Monthly membership for Ama Owusu"`.
    pub description: String,
    /// Flat monthly amount in the smallest currency unit.
    pub unit_amount_cents: i64,
    /// ISO currency code, lowercase (e.g. `"usd"`).
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of creating a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Processor-assigned session id.
    pub id: String,
    /// Hosted checkout page the browser redirects to.
    pub url: String,
}

/// Creates hosted checkout sessions with the payment processor.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Create a subscription checkout session.
    ///
    /// No idempotency key is attached: a retry after a transient failure
    /// opens a second session for the same registration. Both sessions can
    /// be completed, each producing its own settlement event.
    async fn create_subscription_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession>;
}

/// Stripe-backed [`BillingProvider`].
pub struct StripeBilling {
    client: Client,
}

impl StripeBilling {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    async fn create_subscription_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession> {
        let currency: Currency = request.currency.parse().map_err(|_| {
            PaymentError::Config(format!("Unsupported currency '{}'", request.currency))
        })?;

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.client_reference_id = Some(&request.reference_id);

        let mut metadata = HashMap::new();
        metadata.insert("registration_id".to_string(), request.reference_id.clone());
        params.metadata = Some(metadata);

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency,
                unit_amount: Some(request.unit_amount_cents),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.product_name.clone(),
                    description: Some(request.description.clone()),
                    ..Default::default()
                }),
                recurring: Some(CreateCheckoutSessionLineItemsPriceDataRecurring {
                    interval: CreateCheckoutSessionLineItemsPriceDataRecurringInterval::Month,
                    interval_count: Some(1),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }
}
