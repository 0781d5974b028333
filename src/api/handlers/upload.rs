use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::StatusResponse;
use crate::api::origin::RequestOrigin;
use crate::models::UPLOAD_FORM_FIELD;
use crate::services::upload_source::BufferedUpload;
use crate::services::uploaded_file::{UploadError, UploadedFile};
use crate::utils::hash::delete_key;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;
use utoipa::ToSchema;

pub const USE_ORIGINAL_FILENAME_HEADER: &str = "X-Use-Original-Filename";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
    pub url: String,
    pub delete_url: String,
}

/// Multipart body accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn wants_original_name(headers: &HeaderMap) -> bool {
    headers
        .get(USE_ORIGINAL_FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase())
        .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    params(
        ("X-Use-Original-Filename" = Option<String>, Header, description = "Set to 1 to keep the original filename")
    ),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file or unusable filename", body = StatusResponse),
        (status = 401, description = "Unauthorized", body = StatusResponse),
        (status = 413, description = "File too large", body = StatusResponse)
    ),
    security(
        ("upload_password" = [])
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    origin: RequestOrigin,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FORM_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string).ok_or_else(|| {
            UploadError::InvalidInput(format!("field '{}' is not a file", UPLOAD_FORM_FIELD))
        })?;
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some(BufferedUpload::new(filename, data).with_content_type(content_type));
        break;
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    if upload.len() > state.config.max_file_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            upload.len(),
            state.config.max_file_size
        )));
    }

    let size = upload.len();
    let content_type = upload
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let mut file = UploadedFile::new(upload, state.config.clone())?;
    file.set_use_original_name(wants_original_name(&headers));

    if file.use_original_name() {
        file.preserve_original_name().await?;
    }

    file.save(&state.config.upload_dir).await?;
    let filename = file.assigned_name().await?;

    let url = origin.url_for(&format!("uploads/{}", filename))?;
    let key = delete_key(&state.config.delete_secret, &filename)
        .map_err(|e| AppError::Internal(format!("Failed to derive delete key: {}", e)))?;
    let delete_url = origin.url_for(&format!("api/delete/{}?key={}", filename, key))?;

    tracing::info!(
        "Upload complete: {} ({} bytes, declared {})",
        filename,
        size,
        content_type
    );

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        filename,
        url,
        delete_url,
    }))
}
