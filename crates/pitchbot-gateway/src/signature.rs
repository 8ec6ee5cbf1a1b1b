use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the expected signature for a request body: the base64-encoded
/// HMAC-SHA256 of the body under the channel secret.
///
/// The webhook handler only verifies; this is exported so tests (and
/// operational tooling) can produce valid requests.
pub fn compute_signature(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length.
        Err(_) => unreachable!("HMAC key length is unrestricted"),
    };
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies the `X-Line-Signature` header value against the request body.
///
/// Returns `false` for malformed base64 as well as for a mismatch. The
/// comparison is constant-time.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = BASE64.decode(signature) else {
        return false;
    };
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "channel-secret";

    #[test]
    fn test_roundtrip_verifies() {
        let body = br#"{"events":[]}"#;
        let sig = compute_signature(SECRET, body);
        assert!(verify_signature(SECRET, body, &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let sig = compute_signature("other-secret", body);
        assert!(!verify_signature(SECRET, body, &sig));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let sig = compute_signature(SECRET, b"original");
        assert!(!verify_signature(SECRET, b"tampered", &sig));
    }

    #[test]
    fn test_malformed_base64_rejected() {
        assert!(!verify_signature(SECRET, b"body", "not base64!!"));
    }

    #[test]
    fn test_empty_signature_rejected() {
        assert!(!verify_signature(SECRET, b"body", ""));
    }
}
