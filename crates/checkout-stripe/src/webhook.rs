//! # Stripe Webhook Verification & Dispatch
//!
//! Signed-event intake for the checkout flow. Stripe signs each delivery
//! with `Stripe-Signature: t=<unix>,v1=<hex hmac>[,v1=...]` where the HMAC
//! is SHA-256 over `"{t}.{raw body}"` keyed by the endpoint's signing secret.
//!
//! Verification distinguishes two failure modes:
//! - `WebhookSignatureInvalid` - the header or HMAC check failed
//! - `WebhookMalformed` - the payload could not be parsed as an event
//!
//! Both are rejected identically at the HTTP edge; logs keep them apart.

use checkout_core::{CheckoutError, CheckoutResult, WebhookEvent, WebhookEventType};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Maximum accepted skew between the signature timestamp and now
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Verify a signed payload and parse it into a `WebhookEvent`.
pub fn verify_and_parse(
    secret: &str,
    payload: &[u8],
    signature: &str,
) -> CheckoutResult<WebhookEvent> {
    if secret.is_empty() {
        return Err(CheckoutError::Configuration(
            "Webhook signing secret not configured".to_string(),
        ));
    }

    let sig_parts = parse_signature_header(signature)?;

    let now = Utc::now().timestamp();
    if (now - sig_parts.timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(CheckoutError::WebhookSignatureInvalid(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!(
        "{}.{}",
        sig_parts.timestamp,
        String::from_utf8_lossy(payload)
    );
    let expected_sig = compute_hmac_sha256(secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(CheckoutError::WebhookSignatureInvalid(
            "Signature mismatch".to_string(),
        ));
    }

    // Only a verified payload gets parsed
    let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        CheckoutError::WebhookMalformed(format!("Failed to parse webhook: {}", e))
    })?;

    debug!("Verified Stripe webhook: type={}", event.event_type);

    let session_id = event
        .data
        .object
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(WebhookEvent {
        event_id: event.id,
        event_type: WebhookEventType::from_name(&event.event_type),
        provider: "stripe".to_string(),
        session_id,
        raw_object: Some(serde_json::Value::Object(event.data.object)),
        created_at: DateTime::from_timestamp(event.created, 0).unwrap_or_else(Utc::now),
    })
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Signature Verification
// =============================================================================

#[derive(Debug)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> CheckoutResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.splitn(2, '=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        CheckoutError::WebhookSignatureInvalid("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(CheckoutError::WebhookSignatureInvalid(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

// =============================================================================
// Event Dispatch
// =============================================================================

/// Parsed checkout.session.completed event data
#[derive(Debug, Clone)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub metadata: HashMap<String, String>,
}

impl CompletedCheckout {
    /// Parse from a verified webhook event
    pub fn from_event(event: &WebhookEvent) -> CheckoutResult<Self> {
        let raw = event.raw_object.as_ref().ok_or_else(|| {
            CheckoutError::WebhookMalformed("Missing event object".to_string())
        })?;

        let obj = raw.as_object().ok_or_else(|| {
            CheckoutError::WebhookMalformed("Event data is not an object".to_string())
        })?;

        let session_id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| {
                CheckoutError::WebhookMalformed("Missing session id".to_string())
            })?;

        let payment_status = obj
            .get("payment_status")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        let amount_total = obj.get("amount_total").and_then(|v| v.as_i64());

        let metadata = obj
            .get("metadata")
            .and_then(|m| m.as_object())
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            session_id,
            payment_status,
            amount_total,
            metadata,
        })
    }

    /// Check if payment was successful
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// Webhook event handler trait
///
/// Implement this to react to verified events. Defaults log and succeed, so
/// implementations override only what they care about.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// Called when a checkout session is completed
    fn on_checkout_completed(&self, data: CompletedCheckout) -> CheckoutResult<()> {
        info!("Checkout session completed: {}", data.session_id);
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> CheckoutResult<()> {
        debug!("Unhandled webhook event: {:?}", event.event_type);
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a verified webhook event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: WebhookEvent,
) -> CheckoutResult<()> {
    match &event.event_type {
        WebhookEventType::CheckoutSessionCompleted => {
            let data = CompletedCheckout::from_event(&event)?;
            handler.on_checkout_completed(data)
        }
        WebhookEventType::Unknown(_) => handler.on_unknown_event(&event),
    }
}
