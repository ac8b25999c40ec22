use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{job, user};
use crate::models::company::CompanySummary;

/// Request body for `POST /api/users/apply`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ApplyRequest {
    /// Job to apply for. `jobId` is accepted as well.
    #[serde(alias = "jobId")]
    #[schema(example = 3)]
    pub job_id: i32,
}

/// Job fields a user sees on their own applications.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ApplicationJob {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    pub description: String,
    #[schema(example = "Bangalore")]
    pub location: String,
    #[schema(example = "Programming")]
    pub category: String,
    #[schema(example = "Intermediate Level")]
    pub level: String,
    #[schema(example = 1200000)]
    pub salary: i64,
}

impl From<&job::Model> for ApplicationJob {
    fn from(job: &job::Model) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            category: job.category.clone(),
            level: job.level.clone(),
            salary: job.salary,
        }
    }
}

/// Job fields a company sees next to each applicant.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ApplicantJob {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    #[schema(example = "Bangalore")]
    pub location: String,
    #[schema(example = "Programming")]
    pub category: String,
    #[schema(example = "Intermediate Level")]
    pub level: String,
    #[schema(example = 1200000)]
    pub salary: i64,
}

impl From<&job::Model> for ApplicantJob {
    fn from(job: &job::Model) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            location: job.location.clone(),
            category: job.category.clone(),
            level: job.level.clone(),
            salary: job.salary,
        }
    }
}

/// Applicant profile shown to companies.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ApplicantUser {
    #[schema(example = "user_2abc")]
    pub id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub image: String,
    /// Résumé URL, empty when none was uploaded.
    pub resume: String,
}

impl From<&user::Model> for ApplicantUser {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
            resume: user.resume.clone(),
        }
    }
}

/// One of the signed-in user's applications.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserApplication {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub company: Option<CompanySummary>,
    pub job: Option<ApplicationJob>,
}

/// One application received by the signed-in company.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CompanyApplicant {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// `null` once the user has been deleted.
    pub user: Option<ApplicantUser>,
    pub job: Option<ApplicantJob>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserApplicationsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub applications: Vec<UserApplication>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompanyApplicantsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub applications: Vec<CompanyApplicant>,
}
