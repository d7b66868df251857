//! Webhook signature checks.
//!
//! Deliveries are signed with HMAC-SHA256 over the raw request body and sent
//! as `sha256=<lowercase hex digest>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

fn mac(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, so this never fails.
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

/// Computes the signature a delivery of `payload` would carry.
pub fn sign_webhook_payload(payload: impl AsRef<[u8]>, secret: &str) -> String {
    let mut mac = mac(secret);
    mac.update(payload.as_ref());
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

/// Returns true if `signature` is the HMAC-SHA256 of `payload` under `secret`.
///
/// The digest comparison is constant-time. Signatures without the `sha256=`
/// prefix or with a malformed hex digest are rejected.
pub fn verify_webhook_signature(payload: impl AsRef<[u8]>, signature: &str, secret: &str) -> bool {
    let Some(digest) = signature.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest) else {
        return false;
    };

    let mut mac = mac(secret);
    mac.update(payload.as_ref());
    mac.verify_slice(&expected).is_ok()
}
