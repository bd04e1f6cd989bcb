use crate::response::EmptyObject;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// Browsers request this on every page load; answer with an empty JSON object
// instead of falling through to the 404 handler.
#[utoipa::path(
    get,
    path = "/favicon.ico",
    responses(
        (status = 200, description = "Empty placeholder", body = EmptyObject),
    )
)]
pub async fn favicon() -> impl IntoResponse {
    (StatusCode::OK, Json(EmptyObject::default()))
}
