//! HMAC-SHA256 webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying `sha256=<hex>` of the raw request body
pub const SIGNATURE_HEADER: &str = "x-radarr-relay-signature";

/// Generate a random webhook signature secret
pub fn generate_secret() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Signature header value for `body`
pub fn sign(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify webhook signature. The `sha256=` prefix is optional.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    let hex_sig = signature.strip_prefix("sha256=").unwrap_or(signature);
    match hex::decode(hex_sig.trim()) {
        Ok(expected) => mac.verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}
