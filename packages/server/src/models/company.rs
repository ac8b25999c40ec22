use serde::{Deserialize, Serialize};

use crate::entity::company;
use crate::error::AppError;
use crate::models::shared::require_all;

/// Password length cap, keeps hashing cost bounded.
const MAX_PASSWORD_LEN: usize = 128;

/// Text fields of a company registration after validation.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_new_company(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<NewCompany, AppError> {
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(AppError::Validation("All fields are required".into()));
    };
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(NewCompany {
        name,
        email,
        password,
    })
}

/// Request body for company login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "hr@acme.test")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    require_all(
        &[&payload.email, &payload.password],
        "Email and password are required",
    )
}

/// Company as shown to itself and to job seekers. Never carries the password.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CompanySummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Acme Corp")]
    pub name: String,
    #[schema(example = "hr@acme.test")]
    pub email: String,
    /// Logo URL.
    #[schema(example = "https://media.example/logos/0190a4c2.png")]
    pub image: String,
}

impl From<&company::Model> for CompanySummary {
    fn from(company: &company::Model) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            email: company.email.clone(),
            image: company.image.clone(),
        }
    }
}

/// Returned by registration and login.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CompanyAuthResponse {
    #[schema(example = true)]
    pub success: bool,
    pub company: CompanySummary,
    /// Session token for `Authorization: Bearer`.
    pub token: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompanyResponse {
    #[schema(example = true)]
    pub success: bool,
    pub company: CompanySummary,
}

/// Request body for `POST /api/company/change-status`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChangeStatusRequest {
    /// Application ID.
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Accepted")]
    pub status: String,
}

/// Request body for `POST /api/company/change-visibility`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChangeVisibilityRequest {
    /// Job ID.
    #[schema(example = 3)]
    pub id: i32,
}
