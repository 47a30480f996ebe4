use super::{
    handlers::{health, upload},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Reports
        .route("/api/v1/damage-reports", post(upload::file_damage_report))
        // Path the existing upload form posts to
        .route("/upload", post(upload::file_damage_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
