use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::StatusResponse;
use crate::api::middleware::auth::is_authorized;
use crate::services::uploaded_file::UploadedFile;
use crate::utils::hash::verify_delete_key;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Delete key returned with the upload
    pub key: Option<String>,
}

#[utoipa::path(
    delete,
    path = "/api/delete/{filename}",
    params(
        ("filename" = String, Path, description = "Stored filename"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "File deleted", body = StatusResponse),
        (status = 400, description = "Invalid filename", body = StatusResponse),
        (status = 403, description = "Missing or wrong delete key", body = StatusResponse),
        (status = 404, description = "File not found", body = StatusResponse)
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<DeleteQuery>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    let by_key = query
        .key
        .as_deref()
        .is_some_and(|key| verify_delete_key(&state.config.delete_secret, &filename, key));
    // Without a configured password everybody would pass, so only the key counts then
    let by_password =
        state.config.upload_password.is_some() && is_authorized(&state.config, &headers);

    if !by_key && !by_password {
        tracing::warn!("Rejected delete of {:?}: bad or missing key", filename);
        return Err(AppError::Forbidden("Invalid delete key".to_string()));
    }

    if UploadedFile::delete(&state.config, &filename).await? {
        Ok(Json(StatusResponse::success()))
    } else {
        Err(AppError::NotFound("File not found".to_string()))
    }
}
