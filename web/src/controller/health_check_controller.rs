use crate::response::HealthStatus;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// GET liveness probe for orchestrators
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = HealthStatus),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::healthy()))
}
