//! # checkout-web
//!
//! HTTP layer for the hosted-checkout payment flow.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout page, session creation, and redirect landing pages
//! - Signed webhook intake with replay protection
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Checkout page |
//! | POST | `/create-checkout-session/` | Create hosted checkout session |
//! | GET | `/success/` | Post-payment landing page |
//! | GET | `/cancel/` | Cancelled landing page |
//! | POST | `/webhook/` | Stripe webhook |
//! | GET | `/health` | Health check |

pub mod handlers;
pub mod pages;
pub mod replay;
pub mod routes;
pub mod state;

pub use replay::ReplayGuard;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
