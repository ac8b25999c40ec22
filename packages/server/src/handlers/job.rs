use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::job::{JobDetailResponse, JobListResponse};
use crate::services::JobListing;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Jobs",
    operation_id = "listJobs",
    summary = "List open jobs",
    description = "Returns every visible job with its company. Hidden jobs are never listed.",
    responses(
        (status = 200, description = "Visible jobs", body = JobListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<JobListResponse>, AppError> {
    let jobs = JobListing::new(&state.db).list_visible().await?;
    Ok(Json(JobListResponse {
        success: true,
        jobs,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Jobs",
    operation_id = "getJob",
    summary = "Get a job by ID",
    description = "Returns one job with its company, whether or not it is currently visible.",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job details", body = JobDetailResponse),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = JobListing::new(&state.db).get(id).await?;
    Ok(Json(JobDetailResponse { success: true, job }))
}
