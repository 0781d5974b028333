use crate::api::error::AppError;
use crate::api::origin::RequestOrigin;
use crate::models::ClientToolConfig;
use crate::services::uploaded_file::UploadedFile;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/sharex",
    responses(
        (status = 200, description = "Client tool uploader configuration", body = ClientToolConfig)
    ),
    tag = "files"
)]
pub async fn sharex_config(origin: RequestOrigin) -> Result<Json<ClientToolConfig>, AppError> {
    let upload_url = origin.url_for("api/upload")?;
    Ok(Json(UploadedFile::client_tool_config(
        &origin.host,
        &upload_url,
    )))
}
