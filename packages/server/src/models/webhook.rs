use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Envelope of an identity-provider webhook delivery.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ProviderEmail {
    pub email_address: String,
}

/// User object carried by `user.created` and `user.updated`.
#[derive(Debug, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<ProviderEmail>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProviderUser {
    pub fn email(&self) -> String {
        self.email_addresses
            .first()
            .map(|e| e.email_address.clone())
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn image(&self) -> String {
        self.image_url.clone().unwrap_or_default()
    }
}

/// Payload of `user.deleted`.
#[derive(Debug, Deserialize)]
pub struct DeletedUser {
    pub id: String,
}

/// A webhook delivery this service acts on.
#[derive(Debug)]
pub enum UserEvent {
    Created(ProviderUser),
    Updated(ProviderUser),
    Deleted(DeletedUser),
    /// Any other event type. Acknowledged and ignored.
    Ignored(String),
}

impl UserEvent {
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let envelope: WebhookEnvelope = serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Malformed webhook payload: {e}")))?;

        let data = envelope.data;
        let malformed =
            |e: serde_json::Error| AppError::Validation(format!("Malformed webhook data: {e}"));

        Ok(match envelope.kind.as_str() {
            "user.created" => UserEvent::Created(serde_json::from_value(data).map_err(malformed)?),
            "user.updated" => UserEvent::Updated(serde_json::from_value(data).map_err(malformed)?),
            "user.deleted" => UserEvent::Deleted(serde_json::from_value(data).map_err(malformed)?),
            _ => UserEvent::Ignored(envelope.kind),
        })
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct WebhookAck {
    #[schema(example = true)]
    pub success: bool,
}
