//! # Stripe Checkout Sessions
//!
//! Client for Stripe's Checkout Sessions API. The hosted checkout page,
//! payment state, and retry handling all live on Stripe's side; this client
//! creates the session and verifies inbound webhooks.

use crate::config::StripeConfig;
use crate::webhook;
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, CheckoutSession, PaymentGateway, ProviderErrorKind,
    SessionRequest, WebhookEvent,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Stripe Checkout Sessions gateway
///
/// Uses Stripe's hosted checkout page for secure payments.
/// This is the recommended approach for PCI compliance.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(config: StripeConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(StripeConfig::from_env())
    }

    /// Access the loaded configuration
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Classify a non-2xx Stripe response by HTTP status
    fn classify_status(status: reqwest::StatusCode) -> ProviderErrorKind {
        match status.as_u16() {
            429 => ProviderErrorKind::RateLimited,
            401 | 403 => ProviderErrorKind::AuthFailure,
            400 | 402 | 404 => ProviderErrorKind::InvalidRequest,
            _ => ProviderErrorKind::Unknown,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, request), fields(price_id = %request.price_id))]
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> CheckoutResult<CheckoutSession> {
        if !self.config.can_create_sessions() {
            return Err(CheckoutError::Configuration(
                "Stripe secret key or price id missing. Check your environment variables."
                    .to_string(),
            ));
        }

        debug!(
            "Creating Stripe checkout session: quantity={}, automatic_tax={}",
            request.quantity, request.automatic_tax
        );

        // Stripe's REST API takes form-encoded bracket notation
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "line_items[0][price]".to_string(),
                request.price_id.clone(),
            ),
            (
                "line_items[0][quantity]".to_string(),
                request.quantity.to_string(),
            ),
        ];

        if request.automatic_tax {
            form_params.push((
                "automatic_tax[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        for (key, value) in &request.metadata {
            form_params.push((format!("metadata[{}]", key), value.clone()));
        }

        let idempotency_key = request
            .idempotency_key
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let kind = Self::classify_status(status);

            // Prefer the message from Stripe's error envelope
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(CheckoutError::Provider {
                    kind,
                    message: error_response.error.message,
                });
            }

            return Err(CheckoutError::Provider {
                kind,
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session_response: StripeSessionResponse =
            serde_json::from_str(&body).map_err(|e| CheckoutError::Provider {
                kind: ProviderErrorKind::Unknown,
                message: format!("Failed to parse Stripe response: {}", e),
            })?;

        info!("Created Stripe checkout session: id={}", session_response.id);

        let mut session = CheckoutSession::new(session_response.id);
        if let Some(url) = session_response.url {
            session = session.with_url(url);
        }

        Ok(session)
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> CheckoutResult<WebhookEvent> {
        webhook::verify_and_parse(&self.config.webhook_secret, payload, signature)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
