//! # Stripe Configuration
//!
//! Configuration for the Stripe integration. All secrets come from
//! environment variables.
//!
//! Missing values do not abort startup: each endpoint degrades on its own
//! (setup banner, structured 500, webhook 400) so the process stays up with
//! partial configuration.

use std::env;

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Publishable key (pk_test_... or pk_live_...), safe for client exposure
    pub publishable_key: String,

    /// Secret API key (sk_test_... or sk_live_...), server-only
    pub secret_key: String,

    /// Price identifier for the checkout item (price_...)
    pub price_id: String,

    /// Webhook signing secret (whsec_...)
    pub webhook_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Env vars, each optional:
    /// - `STRIPE_PUBLISHABLE_KEY`
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_PRICE_ID`
    /// - `STRIPE_WEBHOOK_SECRET`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            publishable_key: env::var("STRIPE_PUBLISHABLE_KEY").unwrap_or_default(),
            secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            price_id: env::var("STRIPE_PRICE_ID").unwrap_or_default(),
            webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2024-12-18.acacia".to_string(),
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        publishable_key: impl Into<String>,
        secret_key: impl Into<String>,
        price_id: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            secret_key: secret_key.into(),
            price_id: price_id.into(),
            webhook_secret: webhook_secret.into(),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2024-12-18.acacia".to_string(),
        }
    }

    /// All three keys the checkout page needs are present
    pub fn is_complete(&self) -> bool {
        !self.publishable_key.is_empty()
            && !self.secret_key.is_empty()
            && !self.price_id.is_empty()
    }

    /// Session creation needs the secret key and a price id
    pub fn can_create_sessions(&self) -> bool {
        !self.secret_key.is_empty() && !self.price_id.is_empty()
    }

    /// Webhook verification needs the signing secret
    pub fn has_webhook_secret(&self) -> bool {
        !self.webhook_secret.is_empty()
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_flags() {
        let config = StripeConfig::new("pk_test_xyz", "sk_test_abc", "price_123", "whsec_s");
        assert!(config.is_complete());
        assert!(config.can_create_sessions());
        assert!(config.has_webhook_secret());
        assert!(config.is_test_mode());

        let no_price = StripeConfig::new("pk_test_xyz", "sk_test_abc", "", "whsec_s");
        assert!(!no_price.is_complete());
        assert!(!no_price.can_create_sessions());

        let no_secret = StripeConfig::new("pk_test_xyz", "", "price_123", "");
        assert!(!no_secret.is_complete());
        assert!(!no_secret.can_create_sessions());
        assert!(!no_secret.has_webhook_secret());
    }

    #[test]
    fn test_publishable_only_is_incomplete() {
        let config = StripeConfig::new("pk_test_xyz", "", "", "");
        assert!(!config.is_complete());
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("pk_test_xyz", "sk_test_abc123", "price_123", "whsec_s");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }
}
