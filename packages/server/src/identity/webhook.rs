//! Signed webhook deliveries (`svix-id`, `svix-timestamp`, `svix-signature`).
//!
//! The signature is an HMAC-SHA256 over `"{id}.{timestamp}.{body}"` keyed with
//! the base64 part of a `whsec_` secret. The signature header may carry
//! several space-separated `v1,<base64>` entries during key rotation.

use axum::http::HeaderMap;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::IdentityError;

type HmacSha256 = Hmac<Sha256>;

/// Deliveries older or newer than this are rejected as replays.
const TIMESTAMP_TOLERANCE_SECS: u64 = 5 * 60;

const SECRET_PREFIX: &str = "whsec_";

/// The three signature headers of a webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl WebhookHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, IdentityError> {
        let get = |name: &'static str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or(IdentityError::MissingHeader(name))
        };

        Ok(Self {
            id: get("svix-id")?,
            timestamp: get("svix-timestamp")?,
            signature: get("svix-signature")?,
        })
    }
}

pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl WebhookVerifier {
    pub fn new(secret: &str) -> Result<Self, IdentityError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded)
            .map_err(|e| IdentityError::InvalidKey(format!("webhook secret: {e}")))?;
        if key.is_empty() {
            return Err(IdentityError::InvalidKey("webhook secret is empty".into()));
        }
        Ok(Self { key })
    }

    pub fn verify(&self, headers: &WebhookHeaders, body: &[u8]) -> Result<(), IdentityError> {
        self.verify_at(headers, body, Utc::now().timestamp())
    }

    fn verify_at(
        &self,
        headers: &WebhookHeaders,
        body: &[u8],
        now: i64,
    ) -> Result<(), IdentityError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| IdentityError::StaleTimestamp)?;
        if now.abs_diff(timestamp) > TIMESTAMP_TOLERANCE_SECS {
            return Err(IdentityError::StaleTimestamp);
        }

        let mac = self.mac(&headers.id, timestamp, body)?;
        for entry in headers.signature.split_whitespace() {
            let Some(("v1", encoded)) = entry.split_once(',') else {
                continue;
            };
            let Ok(candidate) = STANDARD.decode(encoded) else {
                continue;
            };
            if mac.clone().verify_slice(&candidate).is_ok() {
                return Ok(());
            }
        }

        Err(IdentityError::InvalidSignature)
    }

    /// Compute the `v1,<base64>` signature entry for a delivery.
    pub fn sign(&self, id: &str, timestamp: i64, body: &[u8]) -> Result<String, IdentityError> {
        let digest = self.mac(id, timestamp, body)?.finalize().into_bytes();
        Ok(format!("v1,{}", STANDARD.encode(digest)))
    }

    fn mac(&self, id: &str, timestamp: i64, body: &[u8]) -> Result<HmacSha256, IdentityError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| IdentityError::InvalidKey(e.to_string()))?;
        mac.update(format!("{id}.{timestamp}.").as_bytes());
        mac.update(body);
        Ok(mac)
    }
}
