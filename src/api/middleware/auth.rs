use crate::AppState;
use crate::api::error::AppError;
use crate::config::UploadConfig;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// True when the request carries the configured upload password, or when no
/// password is configured at all. A `Bearer ` prefix is accepted.
pub fn is_authorized(config: &UploadConfig, headers: &HeaderMap) -> bool {
    let Some(expected) = config.upload_password.as_deref() else {
        return true;
    };

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).trim())
        .is_some_and(|given| given == expected)
}

pub async fn upload_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_authorized(&state.config, req.headers()) {
        return Ok(next.run(req).await);
    }

    tracing::warn!("Rejected unauthorized request to {}", req.uri().path());
    Err(AppError::Unauthorized("Unauthorized".to_string()))
}
