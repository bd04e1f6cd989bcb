use crate::controller::{favicon_controller, health_check_controller, home_controller};
use crate::error::Error;
use crate::response::{EmptyObject, ErrorResponse, HealthStatus, ServiceInfo};
use crate::sse::handler as sse_handler;
use crate::AppState;
use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "mce-api"
        ),
        paths(
            home_controller::index,
            health_check_controller::health_check,
            favicon_controller::favicon,
            sse_handler::token_stream_handler,
        ),
        components(
            schemas(
                ServiceInfo,
                HealthStatus,
                EmptyObject,
                ErrorResponse,
            )
        ),
        tags(
            (name = "mce_api", description = "MCE demo API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let mut openapi = ApiDoc::openapi();
    openapi.info.title = app_state.service_name().to_string();

    Router::new()
        .merge(home_routes(app_state.clone()))
        .merge(health_routes())
        .merge(favicon_routes())
        .merge(stream_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", openapi).path("/rapidoc"))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

fn home_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home_controller::index))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/healthz", get(health_check_controller::health_check))
}

fn favicon_routes() -> Router {
    Router::new().route("/favicon.ico", get(favicon_controller::favicon))
}

fn stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/stream", get(sse_handler::token_stream_handler))
        .with_state(app_state)
}

async fn not_found() -> Error {
    Error::NotFound
}

async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
