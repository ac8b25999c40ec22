use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::user;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    #[schema(example = "user_2abc")]
    pub id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub image: String,
    /// Résumé URL, empty when none was uploaded.
    pub resume: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            resume: user.resume,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = true)]
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResumeResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Resume Updated")]
    pub message: String,
    /// New résumé URL.
    pub resume: String,
}
