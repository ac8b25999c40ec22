use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::job;
use crate::error::AppError;
use crate::models::company::CompanySummary;
use crate::models::shared::require_all;

/// Request body for `POST /api/company/post-job`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PostJobRequest {
    #[schema(example = "Backend Engineer")]
    pub title: String,
    /// Rich-text HTML description.
    #[schema(example = "<p>Build and run our APIs.</p>")]
    pub description: String,
    #[schema(example = "Bangalore")]
    pub location: String,
    #[schema(example = 1200000)]
    pub salary: i64,
    #[schema(example = "Intermediate Level")]
    pub level: String,
    #[schema(example = "Programming")]
    pub category: String,
}

pub fn validate_post_job(payload: &PostJobRequest) -> Result<(), AppError> {
    require_all(
        &[
            &payload.title,
            &payload.description,
            &payload.location,
            &payload.level,
            &payload.category,
        ],
        "All job fields are required",
    )?;
    if payload.salary <= 0 {
        return Err(AppError::Validation("Salary must be a positive number".into()));
    }
    Ok(())
}

/// A job as stored.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct JobView {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    pub description: String,
    #[schema(example = "Bangalore")]
    pub location: String,
    #[schema(example = 1200000)]
    pub salary: i64,
    #[schema(example = "Intermediate Level")]
    pub level: String,
    #[schema(example = "Programming")]
    pub category: String,
    #[schema(example = true)]
    pub visible: bool,
    #[schema(example = 1)]
    pub company_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<job::Model> for JobView {
    fn from(job: job::Model) -> Self {
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            location: job.location,
            salary: job.salary,
            level: job.level,
            category: job.category,
            visible: job.visible,
            company_id: job.company_id,
            created_at: job.created_at,
        }
    }
}

/// A job joined with its owning company.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: JobView,
    /// `null` if the company row is gone.
    pub company: Option<CompanySummary>,
}

/// A company's own job annotated with how many users applied.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PostedJob {
    #[serde(flatten)]
    pub job: JobView,
    #[schema(example = 4)]
    pub applicants: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct JobListResponse {
    #[schema(example = true)]
    pub success: bool,
    pub jobs: Vec<JobWithCompany>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct JobDetailResponse {
    #[schema(example = true)]
    pub success: bool,
    pub job: JobWithCompany,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostedJobsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub jobs: Vec<PostedJob>,
}

/// Returned by job creation and visibility changes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct JobResponse {
    #[schema(example = true)]
    pub success: bool,
    pub job: JobView,
}
