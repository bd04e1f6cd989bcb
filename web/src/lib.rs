use axum::http::{header, HeaderValue, Method};
use axum::Router;
use log::*;
use std::future::{Future, IntoFuture};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use service::AppState;

pub mod error;
pub mod router;

pub(crate) mod controller;
pub(crate) mod response;
pub(crate) mod sse;

pub use error::{Error, Result};

/// Builds the full application: the route table wrapped in the CORS layer.
pub fn app(app_state: AppState) -> Router {
    let cors_layer = cors_layer(&app_state.config.allowed_origins);
    router::define_routes(app_state).layer(cors_layer)
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let address = app_state.config.bind_address();

    info!(
        "Starting {} in {} mode",
        app_state.service_name(),
        app_state.config.runtime_env()
    );

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| Error::Bind {
            address: address.clone(),
            source,
        })?;

    info!("Server listening for connections on http://{address}");

    serve(listener, app_state, shutdown_signal()).await
}

/// Serves `listener` until `shutdown` resolves.
///
/// After shutdown, open connections (long-running `/stream` responses in
/// particular) get the configured grace period to finish before the server
/// stops regardless.
pub async fn serve<F>(listener: TcpListener, app_state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let grace = app_state.config.shutdown_grace();

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app(app_state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown signal received, draining open connections");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let grace_expired = async move {
        // Only reachable once shutdown began; the sender lives until then.
        let _ = shutdown_rx.changed().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.map_err(Error::Serve)?,
        _ = grace_expired => {
            warn!("Open connections did not finish within {grace:?}, forcing shutdown");
        }
    }

    info!("Server stopped");
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    debug!("CORS allowed origins: {allowed_origins:?}");

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::ACCEPT, header::CACHE_CONTROL, header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
