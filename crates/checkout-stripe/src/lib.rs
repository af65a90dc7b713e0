//! # checkout-stripe
//!
//! Stripe gateway for the hosted-checkout payment flow.
//!
//! This crate provides:
//!
//! 1. **StripeGateway** - Checkout Sessions API client
//!    - Single-item, payment-mode sessions against a configured price
//!    - Automatic tax, idempotency keys, typed provider errors
//!
//! 2. **Webhook verification** - Stripe-style signed event intake
//!    - `t=...,v1=...` signature header parsing
//!    - HMAC-SHA256 over `timestamp.payload` with constant-time compare
//!    - Event dispatch to a `WebhookHandler`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_stripe::StripeGateway;
//! use checkout_core::{PaymentGateway, SessionRequest};
//!
//! let gateway = StripeGateway::from_env();
//!
//! let request = SessionRequest::new(
//!     &gateway.config().price_id,
//!     "https://shop.example.com/success/?session_id={CHECKOUT_SESSION_ID}",
//!     "https://shop.example.com/cancel/",
//! );
//!
//! let session = gateway.create_checkout_session(&request).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use checkout_stripe::{dispatch_webhook_event, LoggingWebhookHandler};
//!
//! // In your webhook endpoint:
//! let event = gateway.verify_webhook(payload, signature).await?;
//! dispatch_webhook_event(&LoggingWebhookHandler, event)?;
//! ```

pub mod config;
pub mod gateway;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use gateway::StripeGateway;
pub use webhook::{
    dispatch_webhook_event, CompletedCheckout, LoggingWebhookHandler, WebhookHandler,
};
