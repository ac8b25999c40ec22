use chrono::Utc;
use common::storage::{MediaKind, MediaStore};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set, SqlErr,
};
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::entity::{company, user};
use crate::error::AppError;
use crate::models::company::NewCompany;
use crate::models::webhook::{ProviderUser, UserEvent};
use crate::utils::upload::TempUpload;
use crate::utils::{hash, jwt};

const EMAIL_TAKEN: &str = "Company with this email already exists";

/// Company accounts and the local mirror of identity-provider users.
pub struct AccountService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AccountService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create a company account and return it with a fresh session token.
    pub async fn register_company(
        &self,
        form: NewCompany,
        logo: TempUpload,
        media: &dyn MediaStore,
        auth: &AuthConfig,
    ) -> Result<(company::Model, String), AppError> {
        let taken = company::Entity::find()
            .filter(company::Column::Email.eq(&form.email))
            .one(self.conn)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }

        let password = hash::hash_password(&form.password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

        let image = logo.store(media, MediaKind::Logo).await?;

        let new_company = company::ActiveModel {
            name: Set(form.name),
            email: Set(form.email),
            password: Set(password),
            image: Set(image),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let company = self.insert_company(new_company).await?;

        let token = issue_token(&company, auth)?;
        info!(company_id = company.id, "Company registered");
        Ok((company, token))
    }

    /// A concurrent registration that passed the email pre-check is caught
    /// here by the unique index.
    async fn insert_company(
        &self,
        new_company: company::ActiveModel,
    ) -> Result<company::Model, AppError> {
        new_company
            .insert(self.conn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    debug!("Registration race condition: unique constraint caught on insert");
                    AppError::Conflict(EMAIL_TAKEN.into())
                }
                _ => AppError::from(e),
            })
    }

    /// Check company credentials and return the company with a fresh session token.
    pub async fn login_company(
        &self,
        email: &str,
        password: &str,
        auth: &AuthConfig,
    ) -> Result<(company::Model, String), AppError> {
        let company = company::Entity::find()
            .filter(company::Column::Email.eq(email))
            .one(self.conn)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let is_valid = hash::verify_password(password, &company.password)
            .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = issue_token(&company, auth)?;
        Ok((company, token))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User Not Found".into()))
    }

    /// Store a new résumé and point the user at it. The previous file is left
    /// in the media store.
    pub async fn update_resume(
        &self,
        user_id: &str,
        resume: TempUpload,
        media: &dyn MediaStore,
    ) -> Result<String, AppError> {
        let user = self.get_user(user_id).await?;

        let url = resume.store(media, MediaKind::Resume).await?;

        let mut active = user.into_active_model();
        active.resume = Set(url.clone());
        active.update(self.conn).await?;

        Ok(url)
    }

    /// Apply a verified identity-provider event to the local user table.
    pub async fn sync_user(&self, event: UserEvent) -> Result<(), AppError> {
        match event {
            UserEvent::Created(data) => self.upsert_user(data).await,
            UserEvent::Updated(data) => self.upsert_user(data).await,
            UserEvent::Deleted(data) => {
                let result = user::Entity::delete_by_id(data.id.as_str())
                    .exec(self.conn)
                    .await?;
                info!(user_id = %data.id, removed = result.rows_affected, "User deleted");
                Ok(())
            }
            UserEvent::Ignored(kind) => {
                debug!(kind = %kind, "Ignoring webhook event");
                Ok(())
            }
        }
    }

    /// Insert the user, or overwrite the profile fields if it already exists.
    /// Deliveries may be retried or arrive out of order, so both events
    /// behave the same way. The résumé is never touched.
    async fn upsert_user(&self, data: ProviderUser) -> Result<(), AppError> {
        let existing = user::Entity::find_by_id(data.id.as_str())
            .one(self.conn)
            .await?;

        match existing {
            Some(current) => {
                let mut active = current.into_active_model();
                active.name = Set(data.display_name());
                active.email = Set(data.email());
                active.image = Set(data.image());
                active.update(self.conn).await?;
                info!(user_id = %data.id, "User updated");
            }
            None => {
                let new_user = user::ActiveModel {
                    name: Set(data.display_name()),
                    email: Set(data.email()),
                    image: Set(data.image()),
                    resume: Set(String::new()),
                    created_at: Set(Utc::now()),
                    id: Set(data.id),
                    ..Default::default()
                };
                let created = new_user.insert(self.conn).await?;
                info!(user_id = %created.id, "User created");
            }
        }
        Ok(())
    }
}

fn issue_token(company: &company::Model, auth: &AuthConfig) -> Result<String, AppError> {
    jwt::sign(
        company.id,
        &company.email,
        &auth.jwt_secret,
        auth.token_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))
}
