use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    mail_transport: &'static str,
    locale: &'static str,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        mail_transport: state.mail_transport,
        locale: state.config.report_locale.code(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
