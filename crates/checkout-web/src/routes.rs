//! # Routes
//!
//! Axum router for the checkout flow. Paths carry trailing slashes where the
//! external contract does; the webhook route consumes the raw body so the
//! signature is computed over exactly the delivered bytes.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  `/` - checkout page
/// - POST `/create-checkout-session/` - create hosted checkout session
/// - GET  `/success/` - post-payment landing page
/// - GET  `/cancel/` - cancelled landing page
/// - POST `/webhook/` - Stripe webhook (raw body, signature-verified)
/// - GET  `/health` - health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::checkout_page))
        .route(
            "/create-checkout-session/",
            post(handlers::create_checkout_session),
        )
        .route("/success/", get(handlers::success_page))
        .route("/cancel/", get(handlers::cancel_page))
        .route("/webhook/", post(handlers::webhook))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
