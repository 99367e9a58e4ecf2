//! Inbound settlement webhooks: signature verification and event parsing.
//!
//! Verification implements the processor's v1 scheme: the header carries a
//! unix timestamp and one or more HMAC-SHA256 signatures computed over
//! `"{timestamp}.{raw_body}"`. The MAC is computed over the exact request
//! bytes, which is why the HTTP handler must receive the body unparsed.
//!
//! Everything here is pure: callers inject the current time, so the
//! tolerance window is testable without a clock.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age (or clock skew) of a signed payload, in seconds.
/// Matches the processor's own default.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// The only event type that triggers a state change.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

// ---------------------------------------------------------------------------
// Signature verification
// ---------------------------------------------------------------------------

/// Verify a `stripe-signature` header against the raw request body.
///
/// The header format is `t=<unix>,v1=<hex>[,v1=<hex>...]`; unknown schemes
/// (e.g. `v0`) are ignored. Verification succeeds if the timestamp is
/// within `tolerance_secs` of `now_unix` and any `v1` candidate matches.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<()> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = value.parse().ok();
            }
            "v1" => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookSignature("Missing or unparsable timestamp in header".into())
    })?;
    if candidates.is_empty() {
        return Err(PaymentError::WebhookSignature(
            "No v1 signature in header".into(),
        ));
    }

    if (now_unix - timestamp).abs() > tolerance_secs {
        return Err(PaymentError::WebhookSignature(
            "Timestamp outside the tolerance window".into(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::WebhookSignature(format!("Invalid signing secret: {e}")))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    for candidate in candidates {
        let Ok(sig_bytes) = hex::decode(candidate) else {
            continue;
        };
        // verify_slice is a constant-time comparison.
        if mac.clone().verify_slice(&sig_bytes).is_ok() {
            return Ok(());
        }
    }

    Err(PaymentError::WebhookSignature(
        "No signatures found matching the expected signature for payload".into(),
    ))
}

// ---------------------------------------------------------------------------
// Event parsing
// ---------------------------------------------------------------------------

/// A parsed inbound event, reduced to what settlement needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementEvent {
    /// A checkout was completed. `client_reference_id` carries the
    /// registration id the session was opened with; `subscription_id` is
    /// the processor-assigned subscription.
    CheckoutCompleted {
        event_id: String,
        session_id: Option<String>,
        client_reference_id: Option<String>,
        subscription_id: Option<String>,
    },

    /// Any other event type: acknowledged without side effects.
    Ignored {
        event_id: String,
        event_type: String,
    },
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionObject {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    client_reference_id: Option<String>,
    /// A subscription id string, or the expanded subscription object.
    #[serde(default)]
    subscription: Option<serde_json::Value>,
}

/// Parse a raw webhook body into a [`SettlementEvent`].
///
/// Only `checkout.session.completed` is inspected further; everything else
/// becomes [`SettlementEvent::Ignored`].
pub fn parse_event(payload: &[u8]) -> Result<SettlementEvent> {
    let event: WebhookEvent = serde_json::from_slice(payload)
        .map_err(|e| PaymentError::WebhookParse(format!("Invalid event JSON: {e}")))?;

    if event.event_type != CHECKOUT_COMPLETED {
        return Ok(SettlementEvent::Ignored {
            event_id: event.id,
            event_type: event.event_type,
        });
    }

    let session: CheckoutSessionObject = serde_json::from_value(event.data.object)
        .map_err(|e| PaymentError::WebhookParse(format!("Invalid checkout session object: {e}")))?;

    let subscription_id = session.subscription.and_then(|sub| match sub {
        serde_json::Value::String(id) => Some(id),
        serde_json::Value::Object(obj) => {
            obj.get("id").and_then(|v| v.as_str()).map(str::to_string)
        }
        _ => None,
    });

    Ok(SettlementEvent::CheckoutCompleted {
        event_id: event.id,
        session_id: session.id,
        client_reference_id: session.client_reference_id,
        subscription_id,
    })
}

/// Verify the signature over the exact payload bytes, then parse.
pub fn verify_and_parse(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<SettlementEvent> {
    verify_signature(payload, header, secret, tolerance_secs, now_unix)?;
    parse_event(payload)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
