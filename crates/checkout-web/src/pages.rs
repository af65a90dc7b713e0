//! # HTML Pages
//!
//! Inline-rendered pages for the checkout round-trip. The checkout page
//! embeds the publishable key and price id; the success page echoes the
//! session id handed back on the redirect.

use checkout_stripe::StripeConfig;

/// Escape a string for interpolation into HTML text content.
/// The success redirect's session id is caller-supplied and untrusted.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

const CHECKOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Checkout</title>
    <script src="https://js.stripe.com/v3/"></script>
</head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center; max-width: 420px;">
        <div style="font-size: 60px;">&#128179;</div>
        <h1>Checkout</h1>
        __SETUP_BANNER__
        <p style="color: #666;">One-time purchase, price <code>__PRICE_ID__</code>.</p>
        <button id="checkout-button" style="background: #635bff; color: white; border: none; padding: 14px 28px; border-radius: 8px; font-size: 16px; cursor: pointer;">Pay now</button>
    </div>
    <script>
        var stripe = Stripe('__PUBLISHABLE_KEY__');
        document.getElementById('checkout-button').addEventListener('click', function () {
            fetch('/create-checkout-session/', { method: 'POST' })
                .then(function (response) {
                    return response.json().then(function (data) {
                        if (!response.ok) {
                            throw new Error(data.error);
                        }
                        return stripe.redirectToCheckout({ sessionId: data.sessionId });
                    });
                })
                .then(function (result) {
                    if (result && result.error) {
                        alert(result.error.message);
                    }
                })
                .catch(function (err) {
                    alert(err.message);
                });
        });
    </script>
</body>
</html>
"#;

const SETUP_INCOMPLETE_BANNER: &str = r#"<div style="background: #fff3cd; color: #664d03; padding: 12px; border-radius: 8px; margin-bottom: 16px;">Stripe configuration incomplete. Set <code>STRIPE_PUBLISHABLE_KEY</code>, <code>STRIPE_SECRET_KEY</code>, and <code>STRIPE_PRICE_ID</code>.</div>"#;

/// Render the checkout page. Always renders; an incomplete configuration
/// shows a setup banner instead of failing.
pub fn checkout_page(config: &StripeConfig) -> String {
    let banner = if config.is_complete() {
        ""
    } else {
        SETUP_INCOMPLETE_BANNER
    };

    CHECKOUT_TEMPLATE
        .replace("__SETUP_BANNER__", banner)
        .replace("__PUBLISHABLE_KEY__", &escape_html(&config.publishable_key))
        .replace("__PRICE_ID__", &escape_html(&config.price_id))
}

/// Render the post-payment landing page. The session id comes from the
/// provider's redirect query string and is display-only.
pub fn success_page(session_id: Option<&str>) -> String {
    let session_id = escape_html(session_id.unwrap_or("unknown"));
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Successful</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">&#9989;</div>
        <h1>Payment Successful!</h1>
        <p>Session: <code>{}</code></p>
        <p style="color: #666;">Your payment was processed successfully.</p>
    </div>
</body>
</html>
"#,
        session_id
    )
}

/// Render the cancelled landing page.
pub fn cancel_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">&#10060;</div>
        <h1>Payment Cancelled</h1>
        <p style="color: #666;">No charges were made.</p>
    </div>
</body>
</html>
"#
    .to_string()
}
