//! # Request Handlers
//!
//! Axum request handlers for the checkout flow. Session state, idempotent
//! charging, and payment retries all live with the provider; these handlers
//! are request-scoped glue around the injected gateway.

use crate::pages;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use checkout_core::{CheckoutError, PaymentGateway, SessionRequest};
use checkout_stripe::dispatch_webhook_event;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Response Types
// =============================================================================

/// Session creation response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Provider's session id, echoed verbatim
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Structured error payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

fn error_body(err: CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Provider failures surface the vendor's own message
    let message = match err {
        CheckoutError::Provider { message, .. } => message,
        other => other.to_string(),
    };

    (status, Json(ErrorResponse::new(message)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "hosted-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Checkout page. Always 200; incomplete configuration renders a setup
/// banner instead of an error.
pub async fn checkout_page(State(state): State<AppState>) -> impl IntoResponse {
    Html(pages::checkout_page(&state.stripe))
}

/// Create a hosted checkout session and return its id.
#[instrument(skip(state))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    if !state.stripe.can_create_sessions() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(
                "Stripe keys or Price ID missing. Check your environment variables.",
            )),
        ));
    }

    let request = SessionRequest::new(
        &state.stripe.price_id,
        state.success_url(),
        state.cancel_url(),
    )
    .with_metadata("integration_check", "accept_a_payment");

    let session = state
        .gateway
        .create_checkout_session(&request)
        .await
        .map_err(|e| {
            error!("Failed to create checkout session: {}", e);
            error_body(e)
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(SessionResponse {
        session_id: session.session_id,
    }))
}

/// Post-payment landing page. Reads an optional session id from the query
/// string and passes it through for display only.
pub async fn success_page(
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let session_id = params.get("session_id").map(|s| s.as_str());
    Html(pages::success_page(session_id))
}

/// Cancelled landing page.
pub async fn cancel_page() -> impl IntoResponse {
    Html(pages::cancel_page())
}

/// Webhook intake. The provider is the caller, not a browser session, so no
/// cross-site protections apply; authenticity comes from the signature.
#[instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    // Fail closed on misconfiguration, before touching the body
    if !state.stripe.has_webhook_secret() {
        warn!("Stripe webhook secret missing. Ignoring webhook call.");
        return StatusCode::BAD_REQUEST;
    }

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let event = match state.gateway.verify_webhook(&body, signature).await {
        Ok(event) => event,
        Err(e @ CheckoutError::WebhookMalformed(_)) => {
            error!("Invalid payload for Stripe webhook: {}", e);
            return StatusCode::BAD_REQUEST;
        }
        Err(e @ CheckoutError::WebhookSignatureInvalid(_)) => {
            error!("Invalid Stripe signature: {}", e);
            return StatusCode::BAD_REQUEST;
        }
        Err(e) => {
            error!("Webhook verification failed: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    // At-least-once delivery: acknowledge duplicates without re-dispatching
    if !state.replay.first_delivery(&event.event_id) {
        info!("Duplicate webhook delivery acknowledged: {}", event.event_id);
        return StatusCode::OK;
    }

    info!(
        "Received webhook: type={:?}, id={}",
        event.event_type, event.event_id
    );

    // The provider requires a 2xx acknowledgment once verification succeeds,
    // or it keeps retrying delivery
    if let Err(e) = dispatch_webhook_event(state.webhook_handler.as_ref(), event) {
        error!("Webhook handler error: {}", e);
    }

    StatusCode::OK
}
