//! Verification of the gateway's `Stripe-Signature` header.
//!
//! The header looks like `t=1700000000,v1=<hex>,v1=<hex>`. Each `v1` entry is
//! an HMAC-SHA256 over `"{t}.{raw body}"` keyed with the endpoint secret;
//! one match is enough.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Seconds a signed timestamp may drift from the local clock.
pub const DEFAULT_TOLERANCE: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header has no timestamp")]
    MissingTimestamp,
    #[error("signature header has no v1 signature")]
    MissingSignature,
    #[error("timestamp is outside the tolerance window")]
    TimestampOutOfTolerance,
    #[error("no signature matches the payload")]
    Mismatch,
}

pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = Some(value),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    let signed_at = timestamp
        .parse::<i64>()
        .map_err(|_| SignatureError::MissingTimestamp)?;
    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }
    if now.abs_diff(signed_at) > tolerance.unsigned_abs() {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    for signature in signatures {
        let Ok(expected) = hex::decode(signature) else {
            continue;
        };
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        // constant time
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// Builds a header the way the gateway does. Used by tests to sign fixtures.
#[cfg(test)]
pub(crate) fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}
