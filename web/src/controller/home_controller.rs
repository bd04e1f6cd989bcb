use crate::response::ServiceInfo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use service::AppState;

/// GET the homepage, identifying the running service
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service identification", body = ServiceInfo),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(ServiceInfo::new(app_state.service_name())))
}
