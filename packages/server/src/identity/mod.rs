//! Verification of credentials issued by the external identity provider
//! that authenticates job seekers.

mod provider;
pub mod webhook;

use async_trait::async_trait;

pub use provider::JwtIdentityProvider;
pub use webhook::{WebhookHeaders, WebhookVerifier};

/// A job seeker authenticated by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned user identifier.
    pub user_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
    #[error("missing webhook header: {0}")]
    MissingHeader(&'static str),
    #[error("webhook timestamp is outside the accepted window")]
    StaleTimestamp,
    #[error("no matching webhook signature")]
    InvalidSignature,
}

/// Checks user tokens and webhook deliveries from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<Identity, IdentityError>;

    fn verify_webhook(&self, headers: &WebhookHeaders, body: &[u8]) -> Result<(), IdentityError>;
}
