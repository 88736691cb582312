//! HMAC-SHA256 signing in the Shopify webhook scheme.
//!
//! Shopify signs the raw request body with the app's shared secret and sends the
//! base64-encoded digest in `X-Shopify-Hmac-Sha256`. Unlike Standard Webhooks there is no
//! message id or timestamp in the signed content, and the secret is used as-is.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Characters of the signature shown before sending
const PREVIEW_CHARS: usize = 20;

/// Sign a webhook body.
///
/// # Returns
///
/// The base64-encoded HMAC-SHA256 of `payload` keyed by the bytes of `secret`, or `None`
/// if the primitive rejects the key.
pub fn sign_payload(payload: &str, secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    Some(BASE64_STANDARD.encode(signature))
}

/// Verify an `X-Shopify-Hmac-Sha256` value against a body.
///
/// Comparison is constant-time.
pub fn verify_signature(payload: &str, signature: &str, secret: &str) -> bool {
    let Ok(expected) = BASE64_STANDARD.decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Shortened signature for display, e.g. `dmKiIfzIUdGXZKq1KPBx...`
pub fn preview(signature: &str) -> String {
    let head: String = signature.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}
