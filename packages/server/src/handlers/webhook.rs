use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use tracing::{instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::identity::WebhookHeaders;
use crate::models::webhook::{UserEvent, WebhookAck};
use crate::services::AccountService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/webhooks",
    tag = "Webhooks",
    operation_id = "identityWebhook",
    summary = "Receive identity-provider user events",
    description = "Keeps the local user table in sync with `user.created`, `user.updated` and \
                   `user.deleted` events. The raw body must carry a valid `svix-signature` \
                   for the `svix-id` and `svix-timestamp` headers. Other event types are \
                   acknowledged and ignored.",
    request_body(content_type = "application/json", description = "Event envelope `{ type, data }`"),
    responses(
        (status = 200, description = "Event applied or ignored", body = WebhookAck),
        (status = 400, description = "Malformed payload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or invalid signature (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    WebhookHeaders::from_headers(&headers)
        .and_then(|h| state.identity.verify_webhook(&h, &body))
        .map_err(|e| {
            warn!("Rejected webhook delivery: {}", e);
            AppError::TokenInvalid
        })?;

    let event = UserEvent::parse(&body)?;
    AccountService::new(&state.db).sync_user(event).await?;

    Ok(Json(WebhookAck { success: true }))
}
