//! # Application State
//!
//! Shared state for the Axum application. The payment gateway and webhook
//! handler are injected trait objects, so tests swap in mocks and no provider
//! credential ever lives in process-global state.

use crate::replay::ReplayGuard;
use checkout_core::{BoxedPaymentGateway, CheckoutUrls};
use checkout_stripe::{LoggingWebhookHandler, StripeConfig, StripeGateway, WebhookHandler};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for redirect callbacks
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Injected payment gateway
    pub gateway: BoxedPaymentGateway,
    /// Stripe configuration (page rendering and webhook gating)
    pub stripe: StripeConfig,
    /// Redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
    /// Handler for verified webhook events
    pub webhook_handler: Arc<dyn WebhookHandler>,
    /// Dedup of webhook deliveries
    pub replay: ReplayGuard,
}

impl AppState {
    /// Create state with an explicit gateway and configuration
    pub fn new(gateway: BoxedPaymentGateway, stripe: StripeConfig, config: AppConfig) -> Self {
        let urls = CheckoutUrls::new(&config.base_url);
        Self {
            gateway,
            stripe,
            urls,
            config,
            webhook_handler: Arc::new(LoggingWebhookHandler),
            replay: ReplayGuard::new(),
        }
    }

    /// Create state from environment variables with the Stripe gateway.
    ///
    /// Missing Stripe configuration does not fail here: the affected
    /// endpoints degrade per-request instead.
    pub fn from_env() -> Self {
        let config = AppConfig::from_env();
        let stripe = StripeConfig::from_env();
        let gateway = Arc::new(StripeGateway::new(stripe.clone()));
        Self::new(gateway, stripe, config)
    }

    /// Builder: swap the webhook handler
    pub fn with_webhook_handler(mut self, handler: Arc<dyn WebhookHandler>) -> Self {
        self.webhook_handler = handler;
        self
    }

    /// Success URL with the provider's session-id placeholder
    pub fn success_url(&self) -> String {
        self.urls.success_url_with_session()
    }

    /// Cancel URL
    pub fn cancel_url(&self) -> String {
        self.urls.cancel_url()
    }
}
