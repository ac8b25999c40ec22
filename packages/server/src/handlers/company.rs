use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::ApplicationStatus;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthCompany;
use crate::extractors::json::AppJson;
use crate::models::application::CompanyApplicantsResponse;
use crate::models::company::{
    ChangeStatusRequest, ChangeVisibilityRequest, CompanyAuthResponse, CompanyResponse,
    CompanySummary, LoginRequest, validate_login_request, validate_new_company,
};
use crate::models::job::{
    JobResponse, JobView, PostJobRequest, PostedJobsResponse, validate_post_job,
};
use crate::models::shared::{MessageResponse, non_blank};
use crate::services::{AccountService, ApplicationService, JobListing};
use crate::state::AppState;
use crate::utils::upload::TempUpload;

#[utoipa::path(
    post,
    path = "/register",
    tag = "Company",
    operation_id = "registerCompany",
    summary = "Register a company",
    description = "Creates a company account from a multipart form with `name`, `email`, \
                   `password` and an `image` file (the logo). Returns the company and a \
                   session token.",
    request_body(content_type = "multipart/form-data", description = "name, email, password, image"),
    responses(
        (status = 201, description = "Company registered", body = CompanyAuthResponse),
        (status = 400, description = "Missing field or file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let storage = &state.config.storage;
    let temp_dir = storage.upload_temp_dir();

    let mut name = None;
    let mut email = None;
    let mut password = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_owned();
        match field_name.as_str() {
            "image" => {
                image = Some(
                    TempUpload::from_field(field, &temp_dir, storage.max_upload_size).await?,
                );
            }
            "name" | "email" | "password" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read {field_name}: {e}"))
                })?;
                match field_name.as_str() {
                    "name" => name = non_blank(Some(&text)),
                    "email" => email = non_blank(Some(&text)),
                    _ => password = Some(text).filter(|p| !p.is_empty()),
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let form = validate_new_company(name, email, password)?;
    let logo = image.ok_or_else(|| AppError::Validation("All fields are required".into()))?;

    let (company, token) = AccountService::new(&state.db)
        .register_company(form, logo, state.media.as_ref(), &state.config.auth)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CompanyAuthResponse {
            success: true,
            company: CompanySummary::from(&company),
            token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Company",
    operation_id = "loginCompany",
    summary = "Log in as a company",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = CompanyAuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<CompanyAuthResponse>, AppError> {
    validate_login_request(&payload)?;

    let (company, token) = AccountService::new(&state.db)
        .login_company(payload.email.trim(), &payload.password, &state.config.auth)
        .await?;

    Ok(Json(CompanyAuthResponse {
        success: true,
        company: CompanySummary::from(&company),
        token,
    }))
}

#[utoipa::path(
    get,
    path = "/company",
    tag = "Company",
    operation_id = "getCompanyData",
    summary = "Get the signed-in company",
    responses(
        (status = 200, description = "Company profile", body = CompanyResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("company_jwt" = [])),
)]
#[instrument(skip(auth), fields(company_id = auth.id()))]
pub async fn company_data(auth: AuthCompany) -> Json<CompanyResponse> {
    Json(CompanyResponse {
        success: true,
        company: CompanySummary::from(&auth.company),
    })
}

#[utoipa::path(
    post,
    path = "/post-job",
    tag = "Company",
    operation_id = "postJob",
    summary = "Post a new job",
    description = "Creates a visible job owned by the signed-in company. All text fields are \
                   required and the salary must be positive.",
    request_body = PostJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("company_jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(company_id = auth.id(), title = %payload.title))]
pub async fn post_job(
    auth: AuthCompany,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PostJobRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_post_job(&payload)?;

    let job = JobListing::new(&state.db)
        .post_job(auth.id(), payload)
        .await?;
    info!(job_id = job.id, "Job posted");

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            success: true,
            job: JobView::from(job),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/applicants",
    tag = "Company",
    operation_id = "listApplicants",
    summary = "List applications to the company's jobs",
    responses(
        (status = 200, description = "Applications, oldest first", body = CompanyApplicantsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("company_jwt" = [])),
)]
#[instrument(skip(state, auth), fields(company_id = auth.id()))]
pub async fn applicants(
    auth: AuthCompany,
    State(state): State<AppState>,
) -> Result<Json<CompanyApplicantsResponse>, AppError> {
    let applications = ApplicationService::new(&state.db)
        .list_for_company(auth.id())
        .await?;

    Ok(Json(CompanyApplicantsResponse {
        success: true,
        applications,
    }))
}

#[utoipa::path(
    get,
    path = "/list-jobs",
    tag = "Company",
    operation_id = "listPostedJobs",
    summary = "List the company's jobs with applicant counts",
    responses(
        (status = 200, description = "Posted jobs", body = PostedJobsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("company_jwt" = [])),
)]
#[instrument(skip(state, auth), fields(company_id = auth.id()))]
pub async fn list_jobs(
    auth: AuthCompany,
    State(state): State<AppState>,
) -> Result<Json<PostedJobsResponse>, AppError> {
    let jobs = JobListing::new(&state.db)
        .list_for_company(auth.id())
        .await?;

    Ok(Json(PostedJobsResponse {
        success: true,
        jobs,
    }))
}

#[utoipa::path(
    post,
    path = "/change-status",
    tag = "Company",
    operation_id = "changeApplicationStatus",
    summary = "Accept or reject an application",
    description = "Sets the status of an application to `Pending`, `Accepted` or `Rejected`. \
                   Only the company the application was sent to may change it.",
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = MessageResponse),
        (status = 400, description = "Unknown status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Application belongs to another company (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Application not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("company_jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(company_id = auth.id(), application_id = payload.id))]
pub async fn change_status(
    auth: AuthCompany,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChangeStatusRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let status: ApplicationStatus = payload
        .status
        .trim()
        .parse()
        .map_err(|e: common::ParseStatusError| AppError::Validation(e.to_string()))?;

    ApplicationService::new(&state.db)
        .change_status(payload.id, status, auth.id())
        .await?;
    info!(%status, decided = status.is_decided(), "Application status changed");

    Ok(Json(MessageResponse::ok("Status Changed")))
}

#[utoipa::path(
    post,
    path = "/change-visibility",
    tag = "Company",
    operation_id = "changeJobVisibility",
    summary = "Show or hide a job",
    description = "Flips whether a job appears in public listings. Only the owning company may do this.",
    request_body = ChangeVisibilityRequest,
    responses(
        (status = 200, description = "Updated job", body = JobResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Job belongs to another company (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Job not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent toggles kept winning (CONFLICT)", body = ErrorBody),
    ),
    security(("company_jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(company_id = auth.id(), job_id = payload.id))]
pub async fn change_visibility(
    auth: AuthCompany,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChangeVisibilityRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let job = ApplicationService::new(&state.db)
        .toggle_visibility(payload.id, auth.id())
        .await?;

    Ok(Json(JobResponse {
        success: true,
        job: JobView::from(job),
    }))
}
