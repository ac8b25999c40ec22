use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::EntityTrait;

use crate::entity::company;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Job seeker authenticated by the identity provider.
///
/// Add this as a handler parameter to require a signed-in user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Company authenticated by a session token issued at registration or login.
///
/// The company row is loaded on every request, so a token for a deleted
/// company is rejected.
#[derive(Debug, Clone)]
pub struct AuthCompany {
    pub company: company::Model,
}

impl AuthCompany {
    pub fn id(&self) -> i32 {
        self.company.id
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?
        .trim();

    if token.is_empty() {
        return Err(AppError::TokenMissing);
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let identity = state.identity.verify_token(token).await.map_err(|e| {
            tracing::debug!("User token rejected: {}", e);
            AppError::TokenInvalid
        })?;

        Ok(AuthUser {
            user_id: identity.user_id,
        })
    }
}

impl FromRequestParts<AppState> for AuthCompany {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Company token rejected: {}", e);
            AppError::TokenInvalid
        })?;

        let company = company::Entity::find_by_id(claims.cid)
            .one(&state.db)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        Ok(AuthCompany { company })
    }
}
