use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::application::{ApplyRequest, UserApplicationsResponse};
use crate::models::shared::MessageResponse;
use crate::models::user::{ResumeResponse, UserProfile, UserResponse};
use crate::services::{AccountService, ApplicationService};
use crate::state::AppState;
use crate::utils::upload::TempUpload;

#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    operation_id = "getUserData",
    summary = "Get the signed-in user's profile",
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not synced yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("user_jwt" = [])),
)]
#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn user_data(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AccountService::new(&state.db).get_user(&auth.user_id).await?;
    Ok(Json(UserResponse {
        success: true,
        user: UserProfile::from(user),
    }))
}

#[utoipa::path(
    post,
    path = "/apply",
    tag = "Users",
    operation_id = "applyForJob",
    summary = "Apply for a job",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application recorded as Pending", body = MessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already applied (CONFLICT)", body = ErrorBody),
    ),
    security(("user_jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(user_id = %auth.user_id, job_id = payload.job_id))]
pub async fn apply(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ApplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let application = ApplicationService::new(&state.db)
        .apply(payload.job_id, &auth.user_id)
        .await?;
    info!(application_id = application.id, "Application submitted");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("Applied Successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/applications",
    tag = "Users",
    operation_id = "listUserApplications",
    summary = "List the signed-in user's applications",
    responses(
        (status = 200, description = "Applications, oldest first", body = UserApplicationsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("user_jwt" = [])),
)]
#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn applications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserApplicationsResponse>, AppError> {
    let applications = ApplicationService::new(&state.db)
        .list_for_user(&auth.user_id)
        .await?;

    Ok(Json(UserApplicationsResponse {
        success: true,
        applications,
    }))
}

#[utoipa::path(
    post,
    path = "/update-resume",
    tag = "Users",
    operation_id = "updateResume",
    summary = "Upload a new résumé",
    description = "Replaces the signed-in user's résumé with the `resume` file of a multipart form.",
    request_body(content_type = "multipart/form-data", description = "resume"),
    responses(
        (status = 200, description = "Résumé updated", body = ResumeResponse),
        (status = 400, description = "No file or file too large (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("user_jwt" = [])),
)]
#[instrument(skip(state, auth, multipart), fields(user_id = %auth.user_id))]
pub async fn update_resume(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeResponse>, AppError> {
    let storage = &state.config.storage;
    let temp_dir = storage.upload_temp_dir();
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("resume") {
            resume =
                Some(TempUpload::from_field(field, &temp_dir, storage.max_upload_size).await?);
        }
    }

    let resume = resume.ok_or_else(|| AppError::Validation("No resume file provided".into()))?;

    let url = AccountService::new(&state.db)
        .update_resume(&auth.user_id, resume, state.media.as_ref())
        .await?;

    Ok(Json(ResumeResponse {
        success: true,
        message: "Resume Updated".into(),
        resume: url,
    }))
}
