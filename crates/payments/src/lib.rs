//! Payment-processor boundary.
//!
//! The rest of the workspace talks to the processor through two seams:
//!
//! - [`BillingProvider`] -- creating hosted checkout sessions. The production
//!   implementation is [`StripeBilling`]; tests substitute a mock.
//! - [`webhook`] -- verifying and parsing inbound settlement events. This is
//!   pure code (HMAC over raw bytes), so the webhook contract is testable
//!   without any network.
//!
//! Card data never enters this crate; the processor hosts the checkout page
//! and stores the payment method.

pub mod checkout;
pub mod error;
pub mod webhook;

pub use checkout::{BillingProvider, CheckoutRequest, CheckoutSession, StripeBilling};
pub use error::PaymentError;
pub use webhook::{parse_event, verify_and_parse, verify_signature, SettlementEvent};
