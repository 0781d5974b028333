use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub upload_dir: String,
    pub writable: bool,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    // A missing directory is created on first upload, so it counts as writable
    let writable = match tokio::fs::metadata(&state.config.upload_dir).await {
        Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
        Err(e) => e.kind() == std::io::ErrorKind::NotFound,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        upload_dir: state.config.upload_dir.display().to_string(),
        writable,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
