/// Liveness probe.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "health",
    responses((status = 200, description = "Server is up", body = String, content_type = "text/plain")),
)]
pub async fn health() -> &'static str {
    "API Working"
}
