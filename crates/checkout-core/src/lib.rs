//! # checkout-core
//!
//! Core types and traits for the hosted-checkout payment flow.
//!
//! This crate provides:
//! - `PaymentGateway` trait for payment provider clients
//! - `SessionRequest` and `CheckoutSession` for the checkout flow
//! - `WebhookEvent` for provider notifications
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutUrls, PaymentGateway, SessionRequest};
//!
//! let urls = CheckoutUrls::new("https://shop.example.com");
//!
//! let request = SessionRequest::new(
//!     "price_1ABC",
//!     urls.success_url_with_session(),
//!     urls.cancel_url(),
//! );
//!
//! // `gateway` is any injected PaymentGateway implementation
//! let session = gateway.create_checkout_session(&request).await?;
//!
//! // Hand session.session_id to the browser for the hosted redirect
//! ```

pub mod error;
pub mod event;
pub mod gateway;

// Re-exports for convenience
pub use error::{CheckoutError, CheckoutResult, ProviderErrorKind};
pub use event::{WebhookEvent, WebhookEventType};
pub use gateway::{BoxedPaymentGateway, CheckoutSession, CheckoutUrls, PaymentGateway, SessionRequest};
