//! Payment error types.

use thiserror::Error;

/// Result type alias for payment operations.
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors crossing the payment-processor boundary.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor API call failed (network, invalid price, etc.).
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Webhook signature verification failed.
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload could not be parsed.
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Configuration error (missing key, unsupported currency).
    #[error("Configuration error: {0}")]
    Config(String),
}
