pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{Json, routing::get};
use tower_http::services::ServeDir;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::StorageBackend;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Portal API",
        version = "1.0.0",
        description = "Companies post jobs and review applicants; job seekers browse and apply."
    ),
    tags(
        (name = "Company", description = "Company accounts, job posting and applicant review"),
        (name = "Jobs", description = "Public job listings"),
        (name = "Users", description = "Job seeker profile and applications"),
        (name = "Webhooks", description = "Identity-provider user sync"),
        (name = "Health", description = "Liveness"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "company_jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token from company register or login"))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "user_jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token issued by the identity provider"))
                    .build(),
            ),
        );
    }
}

/// Build the application router with its request pipeline.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(handlers::health::health))
        .routes(routes!(handlers::webhook::receive))
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    let storage = &state.config.storage;
    let media_dir = (storage.backend == StorageBackend::Filesystem)
        .then(|| storage.filesystem.base_path.clone());
    let cors = state.config.server.cors.clone();

    let openapi = api.clone();
    let mut router = router
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(openapi) }),
        )
        .merge(Scalar::with_url("/scalar", api));

    if let Some(dir) = media_dir {
        router = router.nest_service("/media", ServeDir::new(dir));
    }

    middleware::apply(router, &cors)
}
