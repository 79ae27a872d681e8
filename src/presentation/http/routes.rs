//! HTTP Routes
//!
//! Defines all HTTP API routes for the application.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers;
use crate::application::services::upload_service::UPLOAD_DIRECTORY;
use crate::config::StorageBackendKind;
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_metrics;
use crate::startup::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // API v1 routes
        .nest("/api/v1", api_routes(&state))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler));

    // Locally stored documents are served at the URL the storage returned.
    let storage = &state.settings.storage;
    if storage.backend == StorageBackendKind::Local {
        let prefix = format!("/{}", UPLOAD_DIRECTORY);
        router = router.nest_service(
            &prefix,
            ServeDir::new(storage.local_root.join(UPLOAD_DIRECTORY)),
        );
    }

    router
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/applications", application_routes())
        .nest("/uploads", upload_routes(state))
        .route("/pricing/quote", get(handlers::pricing::get_quote))
        .route("/catalog", get(handlers::pricing::get_catalog))
}

/// Application record routes
fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::application::create_application))
        .route(
            "/{id}",
            get(handlers::application::get_application)
                .patch(handlers::application::update_application),
        )
        .route("/{id}/submit", post(handlers::application::submit_application))
}

/// Document upload routes. The body limit leaves room for multipart framing
/// around the largest accepted file.
fn upload_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::upload::upload_file)
                .layer(DefaultBodyLimit::max(state.settings.uploads.max_request_bytes)),
        )
        .route("/delete", post(handlers::upload::delete_file))
}
