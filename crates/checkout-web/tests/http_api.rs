//! End-to-end tests for the checkout HTTP surface, with an injected mock
//! gateway for session creation and real signature verification for the
//! webhook intake.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use checkout_core::{
    CheckoutError, CheckoutResult, CheckoutSession, PaymentGateway, ProviderErrorKind,
    SessionRequest, WebhookEvent,
};
use checkout_stripe::{CompletedCheckout, StripeConfig, StripeGateway, WebhookHandler};
use checkout_web::{create_router, AppConfig, AppState};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

const WEBHOOK_SECRET: &str = "whsec_test_secret";

// =============================================================================
// Test Fixtures
// =============================================================================

fn app_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        base_url: "https://shop.example.com".to_string(),
        environment: "test".to_string(),
    }
}

fn stripe_config() -> StripeConfig {
    StripeConfig::new("pk_test_xyz", "sk_test_abc", "price_123", WEBHOOK_SECRET)
}

/// Gateway double: scripted session creation, no webhook verification.
struct MockGateway {
    result: Result<&'static str, (ProviderErrorKind, &'static str)>,
    seen: Mutex<Option<SessionRequest>>,
}

impl MockGateway {
    fn succeeding(session_id: &'static str) -> Self {
        Self {
            result: Ok(session_id),
            seen: Mutex::new(None),
        }
    }

    fn failing(kind: ProviderErrorKind, message: &'static str) -> Self {
        Self {
            result: Err((kind, message)),
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> CheckoutResult<CheckoutSession> {
        *self.seen.lock() = Some(request.clone());
        match self.result {
            Ok(session_id) => Ok(CheckoutSession::new(session_id)),
            Err((kind, message)) => Err(CheckoutError::provider(kind, message)),
        }
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> CheckoutResult<WebhookEvent> {
        Err(CheckoutError::WebhookSignatureInvalid(
            "mock gateway does not verify webhooks".to_string(),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Webhook handler that records completed session ids.
#[derive(Default)]
struct RecordingHandler {
    completed: Mutex<Vec<String>>,
}

impl WebhookHandler for RecordingHandler {
    fn on_checkout_completed(&self, data: CompletedCheckout) -> CheckoutResult<()> {
        self.completed.lock().push(data.session_id);
        Ok(())
    }
}

fn server_with_mock(gateway: Arc<MockGateway>, stripe: StripeConfig) -> TestServer {
    let state = AppState::new(gateway, stripe, app_config());
    TestServer::new(create_router(state)).expect("test server")
}

/// Server wired with the real Stripe gateway (webhook verification is local,
/// no API calls happen) and a recording webhook handler.
fn webhook_server(stripe: StripeConfig) -> (TestServer, Arc<RecordingHandler>) {
    let handler = Arc::new(RecordingHandler::default());
    let gateway = Arc::new(StripeGateway::new(stripe.clone()));
    let state =
        AppState::new(gateway, stripe, app_config()).with_webhook_handler(handler.clone());
    let server = TestServer::new(create_router(state)).expect("test server");
    (server, handler)
}

fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(signed_payload.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

fn event_payload(event_id: &str, event_type: &str, session_id: &str) -> Vec<u8> {
    json!({
        "id": event_id,
        "type": event_type,
        "created": Utc::now().timestamp(),
        "data": {
            "object": {
                "id": session_id,
                "payment_status": "paid",
                "amount_total": 1999
            }
        }
    })
    .to_string()
    .into_bytes()
}

fn signature_header(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("stripe-signature"),
        HeaderValue::from_str(value).expect("header value"),
    )
}

// =============================================================================
// Checkout Page
// =============================================================================

#[tokio::test]
async fn checkout_page_renders_with_complete_config() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("pk_test_xyz"));
    assert!(html.contains("price_123"));
    assert!(!html.contains("Stripe configuration incomplete"));
}

#[tokio::test]
async fn checkout_page_renders_banner_when_incomplete() {
    let incomplete = StripeConfig::new("pk_test_xyz", "", "price_123", "");
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), incomplete);

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Stripe configuration incomplete"));
}

// =============================================================================
// Session Creation
// =============================================================================

#[tokio::test]
async fn create_session_without_secret_key_is_500() {
    let incomplete = StripeConfig::new("pk_test_xyz", "", "price_123", "");
    let gateway = Arc::new(MockGateway::succeeding("cs_never"));
    let server = server_with_mock(gateway.clone(), incomplete);

    // Body content is irrelevant to the precondition check
    let response = server
        .post("/create-checkout-session/")
        .text("arbitrary body")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("missing"));
    // The gateway was never consulted
    assert!(gateway.seen.lock().is_none());
}

#[tokio::test]
async fn create_session_without_price_id_is_500() {
    let incomplete = StripeConfig::new("pk_test_xyz", "sk_test_abc", "", "");
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_never")), incomplete);

    let response = server.post("/create-checkout-session/").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn create_session_echoes_provider_session_id() {
    let gateway = Arc::new(MockGateway::succeeding("cs_test_42"));
    let server = server_with_mock(gateway.clone(), stripe_config());

    let response = server.post("/create-checkout-session/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["sessionId"], "cs_test_42");

    // The handler asked for the configured price with the templated success URL
    let seen = gateway.seen.lock();
    let request = seen.as_ref().expect("gateway called");
    assert_eq!(request.price_id, "price_123");
    assert_eq!(request.quantity, 1);
    assert!(request.automatic_tax);
    assert!(request.success_url.contains("{CHECKOUT_SESSION_ID}"));
    assert_eq!(request.cancel_url, "https://shop.example.com/cancel/");
    assert_eq!(
        request.metadata.get("integration_check").map(|s| s.as_str()),
        Some("accept_a_payment")
    );
}

#[tokio::test]
async fn create_session_surfaces_provider_error_as_400() {
    let gateway = Arc::new(MockGateway::failing(
        ProviderErrorKind::InvalidRequest,
        "No such price: 'price_123'",
    ));
    let server = server_with_mock(gateway, stripe_config());

    let response = server.post("/create-checkout-session/").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No such price: 'price_123'");
}

#[tokio::test]
async fn create_session_rejects_get() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server.get("/create-checkout-session/").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Landing Pages
// =============================================================================

#[tokio::test]
async fn success_page_echoes_session_id() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server.get("/success/?session_id=cs_test_99").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("cs_test_99"));
}

#[tokio::test]
async fn success_page_escapes_untrusted_session_id() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server
        .get("/success/?session_id=%3Cscript%3Ealert(1)%3C/script%3E")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn success_page_without_session_id_still_renders() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server.get("/success/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("unknown"));
}

#[tokio::test]
async fn cancel_page_renders() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server.get("/cancel/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Payment Cancelled"));
}

// =============================================================================
// Webhook
// =============================================================================

#[tokio::test]
async fn webhook_without_configured_secret_is_400() {
    let no_secret = StripeConfig::new("pk_test_xyz", "sk_test_abc", "price_123", "");
    let (server, handler) = webhook_server(no_secret);

    let payload = event_payload("evt_1", "checkout.session.completed", "sess_123");
    let header = sign(&payload, WEBHOOK_SECRET, Utc::now().timestamp());
    let (name, value) = signature_header(&header);

    let response = server
        .post("/webhook/")
        .add_header(name, value)
        .bytes(payload.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(handler.completed.lock().is_empty());
}

#[tokio::test]
async fn webhook_without_signature_header_is_400() {
    let (server, handler) = webhook_server(stripe_config());

    let payload = event_payload("evt_1", "checkout.session.completed", "sess_123");
    let response = server.post("/webhook/").bytes(payload.into()).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(handler.completed.lock().is_empty());
}

#[tokio::test]
async fn webhook_with_wrong_signature_is_400() {
    let (server, handler) = webhook_server(stripe_config());

    let payload = event_payload("evt_1", "checkout.session.completed", "sess_123");
    let header = sign(&payload, "whsec_wrong_secret", Utc::now().timestamp());
    let (name, value) = signature_header(&header);

    let response = server
        .post("/webhook/")
        .add_header(name, value)
        .bytes(payload.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(handler.completed.lock().is_empty());
}

#[tokio::test]
async fn webhook_with_malformed_payload_is_400() {
    let (server, handler) = webhook_server(stripe_config());

    let payload = b"not json at all".to_vec();
    let header = sign(&payload, WEBHOOK_SECRET, Utc::now().timestamp());
    let (name, value) = signature_header(&header);

    let response = server
        .post("/webhook/")
        .add_header(name, value)
        .bytes(payload.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(handler.completed.lock().is_empty());
}

#[tokio::test]
async fn webhook_completed_event_reaches_handler() {
    let (server, handler) = webhook_server(stripe_config());

    let payload = event_payload("evt_1", "checkout.session.completed", "sess_123");
    let header = sign(&payload, WEBHOOK_SECRET, Utc::now().timestamp());
    let (name, value) = signature_header(&header);

    let response = server
        .post("/webhook/")
        .add_header(name, value)
        .bytes(payload.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(*handler.completed.lock(), vec!["sess_123".to_string()]);
}

#[tokio::test]
async fn webhook_unknown_event_is_acknowledged_and_ignored() {
    let (server, handler) = webhook_server(stripe_config());

    let payload = event_payload("evt_2", "invoice.paid", "in_123");
    let header = sign(&payload, WEBHOOK_SECRET, Utc::now().timestamp());
    let (name, value) = signature_header(&header);

    let response = server
        .post("/webhook/")
        .add_header(name, value)
        .bytes(payload.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(handler.completed.lock().is_empty());
}

#[tokio::test]
async fn webhook_duplicate_delivery_is_acknowledged_once() {
    let (server, handler) = webhook_server(stripe_config());

    let payload = event_payload("evt_1", "checkout.session.completed", "sess_123");
    let header = sign(&payload, WEBHOOK_SECRET, Utc::now().timestamp());

    for _ in 0..2 {
        let (name, value) = signature_header(&header);
        let response = server
            .post("/webhook/")
            .add_header(name, value)
            .bytes(payload.clone().into())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    // Dispatched exactly once despite two deliveries
    assert_eq!(*handler.completed.lock(), vec!["sess_123".to_string()]);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let server = server_with_mock(Arc::new(MockGateway::succeeding("cs_x")), stripe_config());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}
