use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Room for the multipart framing and text fields around an upload.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Routes mounted under `/api`.
pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let body_limit = DefaultBodyLimit::max(
        (config.storage.max_upload_size + MULTIPART_OVERHEAD) as usize,
    );

    OpenApiRouter::new()
        .nest("/company", company_routes().layer(body_limit.clone()))
        .nest("/jobs", job_routes())
        .nest("/users", user_routes().layer(body_limit))
}

fn company_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::company::register))
        .routes(routes!(handlers::company::login))
        .routes(routes!(handlers::company::company_data))
        .routes(routes!(handlers::company::post_job))
        .routes(routes!(handlers::company::applicants))
        .routes(routes!(handlers::company::list_jobs))
        .routes(routes!(handlers::company::change_status))
        .routes(routes!(handlers::company::change_visibility))
}

fn job_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::job::list_jobs))
        .routes(routes!(handlers::job::get_job))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::user_data))
        .routes(routes!(handlers::user::apply))
        .routes(routes!(handlers::user::applications))
        .routes(routes!(handlers::user::update_resume))
}
