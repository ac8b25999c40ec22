use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use super::{Identity, IdentityError, IdentityProvider, WebhookHeaders, WebhookVerifier};
use crate::config::{IdentityAlgorithm, IdentityConfig};

#[derive(Debug, Deserialize)]
struct ProviderClaims {
    sub: String,
}

/// Identity provider backed by signed JWT session tokens and signed
/// webhook deliveries.
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
    webhooks: WebhookVerifier,
}

impl JwtIdentityProvider {
    pub fn from_config(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let (key, algorithm) = match config.algorithm {
            IdentityAlgorithm::HS256 => (
                DecodingKey::from_secret(config.key.as_bytes()),
                Algorithm::HS256,
            ),
            IdentityAlgorithm::RS256 => (
                DecodingKey::from_rsa_pem(config.key.as_bytes())
                    .map_err(|e| IdentityError::InvalidKey(e.to_string()))?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        // Session tokens carry no audience.
        validation.validate_aud = false;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            key,
            validation,
            webhooks: WebhookVerifier::new(&config.webhook_secret)?,
        })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Identity, IdentityError> {
        let data = decode::<ProviderClaims>(token, &self.key, &self.validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(IdentityError::InvalidToken("empty subject".into()));
        }

        Ok(Identity {
            user_id: data.claims.sub,
        })
    }

    fn verify_webhook(&self, headers: &WebhookHeaders, body: &[u8]) -> Result<(), IdentityError> {
        self.webhooks.verify(headers, body)
    }
}
