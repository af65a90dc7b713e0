//! # Webhook Event Types
//!
//! Parsed provider notification events. The checkout flow reacts to exactly
//! one event type; everything else passes through as `Unknown`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Hosted checkout session completed
    CheckoutSessionCompleted,
    /// Unknown event (passthrough, acknowledged but ignored)
    Unknown(String),
}

impl WebhookEventType {
    /// Map a provider event-type name onto our enum
    pub fn from_name(name: &str) -> Self {
        match name {
            "checkout.session.completed" => WebhookEventType::CheckoutSessionCompleted,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }
}

/// A verified, parsed webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from the provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Related checkout session ID (if the event carries one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Raw event object (for handlers that need more fields)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_object: Option<serde_json::Value>,

    /// When the provider created the event
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(
            WebhookEventType::from_name("checkout.session.completed"),
            WebhookEventType::CheckoutSessionCompleted
        );
        assert_eq!(
            WebhookEventType::from_name("invoice.paid"),
            WebhookEventType::Unknown("invoice.paid".to_string())
        );
    }
}
