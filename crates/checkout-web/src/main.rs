//! # Hosted Checkout
//!
//! Minimal web-facing checkout flow backed by Stripe's hosted checkout page.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PRICE_ID=price_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//!
//! # Run the server
//! hosted-checkout
//! ```

use checkout_core::PaymentGateway;
use checkout_web::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::from_env();

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());

    if !state.stripe.is_complete() {
        warn!("Stripe configuration incomplete; checkout will render a setup banner");
    }
    if !state.stripe.has_webhook_secret() {
        warn!("Stripe webhook secret missing; webhook deliveries will be rejected");
    }

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚀 Hosted checkout starting on http://{}", addr);

    if !is_prod {
        info!("💳 Checkout: http://{}/", addr);
        info!("🔔 Webhook: POST http://{}/webhook/", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
