//! # Checkout Error Types
//!
//! Typed error handling for the hosted-checkout flow.
//! All gateway operations return `Result<T, CheckoutError>`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a provider-side failure.
///
/// Provider failures are explicit result variants rather than caught
/// exception types, so callers can branch without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Provider rejected the request for rate-limiting reasons
    RateLimited,
    /// Request was malformed or referenced unknown objects
    InvalidRequest,
    /// Credentials were missing, invalid, or lacked permission
    AuthFailure,
    /// Anything the provider did not classify
    Unknown,
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProviderErrorKind::RateLimited => "rate_limited",
            ProviderErrorKind::InvalidRequest => "invalid_request",
            ProviderErrorKind::AuthFailure => "auth_failure",
            ProviderErrorKind::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, missing price id)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment provider API error
    #[error("Provider error [{kind}]: {message}")]
    Provider {
        kind: ProviderErrorKind,
        message: String,
    },

    /// Network/HTTP error communicating with the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Webhook signature did not match the shared secret
    #[error("Webhook signature invalid: {0}")]
    WebhookSignatureInvalid(String),

    /// Webhook payload could not be parsed
    #[error("Webhook payload malformed: {0}")]
    WebhookMalformed(String),
}

impl CheckoutError {
    /// Shorthand for a provider error
    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        CheckoutError::Provider {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_)
                | CheckoutError::Provider {
                    kind: ProviderErrorKind::RateLimited,
                    ..
                }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Provider { .. } => 400,
            CheckoutError::Network(_) => 400,
            CheckoutError::WebhookSignatureInvalid(_) => 400,
            CheckoutError::WebhookMalformed(_) => 400,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
