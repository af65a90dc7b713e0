//! # Payment Gateway Trait
//!
//! Seam between the HTTP layer and the payment provider. The gateway is an
//! explicitly constructed, injected client object; nothing in this workspace
//! assigns provider credentials to process-global state.

use crate::error::CheckoutResult;
use crate::event::WebhookEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Request to create a hosted checkout session for one priced item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Provider price identifier (e.g. `price_...`)
    pub price_id: String,

    /// Quantity of the priced item
    pub quantity: u32,

    /// URL the provider redirects to after payment.
    /// May carry the provider's session-id template placeholder.
    pub success_url: String,

    /// URL the provider redirects to if the customer backs out
    pub cancel_url: String,

    /// Whether the provider should compute tax automatically
    pub automatic_tax: bool,

    /// Metadata attached to the session, echoed back on webhooks
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,

    /// Idempotency key (prevents duplicate sessions on retry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl SessionRequest {
    /// Create a single-item, single-quantity payment request
    pub fn new(
        price_id: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            price_id: price_id.into(),
            quantity: 1,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            automatic_tax: true,
            metadata: HashMap::new(),
            idempotency_key: None,
        }
    }

    /// Builder: set quantity
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Builder: add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder: set idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// A checkout session created by a payment provider.
///
/// The id is an opaque reference; it is handed to the browser and echoed back
/// on the success redirect, never stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Hosted checkout URL, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CheckoutSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            url: None,
        }
    }

    /// Builder: set the hosted checkout URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Core trait for payment provider clients.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session.
    ///
    /// # Returns
    /// A `CheckoutSession` whose id the browser uses for the hosted redirect.
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> CheckoutResult<CheckoutSession>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes
    /// * `signature` - Signature header from the request
    ///
    /// Failure distinguishes a malformed payload from a signature mismatch;
    /// the caller surfaces both identically and logs them apart.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> CheckoutResult<WebhookEvent>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// URLs used in the checkout redirect round-trip
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the application (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            success_path: "/success/".to_string(),
            cancel_path: "/cancel/".to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }

    /// Success URL with the provider's session-id template placeholder.
    /// The provider substitutes the real id at redirect time.
    pub fn success_url_with_session(&self) -> String {
        if self.success_url().contains('?') {
            format!("{}&session_id={{CHECKOUT_SESSION_ID}}", self.success_url())
        } else {
            format!("{}?session_id={{CHECKOUT_SESSION_ID}}", self.success_url())
        }
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
