use crate::AppState;
use crate::api::error::AppError;
use crate::services::uploaded_file::UploadError;
use crate::utils::path::safe_join;
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

const SNIFF_LEN: usize = 8192;

/// Content type from the leading bytes: magic numbers first, then UTF-8 text,
/// then octet-stream. Markup is never served as such.
pub fn sniff_content_type(header: &[u8]) -> String {
    if let Some(kind) = infer::get(header) {
        let mime_type = kind.mime_type();
        if mime_type == "text/html" || mime_type.contains("xml") {
            return mime::TEXT_PLAIN_UTF_8.to_string();
        }
        return mime_type.to_string();
    }

    let is_text = !header.contains(&0)
        && match std::str::from_utf8(header) {
            Ok(_) => true,
            // A multi-byte char cut off by the sniff window is still text
            Err(e) => e.error_len().is_none(),
        };

    if is_text {
        mime::TEXT_PLAIN_UTF_8.to_string()
    } else {
        mime::APPLICATION_OCTET_STREAM.to_string()
    }
}

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File content stream"),
        (status = 400, description = "Invalid filename"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = safe_join(&state.config.upload_dir, &filename)
        .ok_or_else(|| UploadError::PathTraversal(filename.clone()))?;

    let mut file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Err(e) => return Err(UploadError::Io(e).into()),
    };

    let metadata = file.metadata().await.map_err(UploadError::Io)?;
    if !metadata.is_file() {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let mut head = vec![0u8; SNIFF_LEN];
    let mut n = 0;
    while n < SNIFF_LEN {
        let read = file.read(&mut head[n..]).await.map_err(UploadError::Io)?;
        if read == 0 {
            break;
        }
        n += read;
    }
    head.truncate(n);

    let content_type = sniff_content_type(&head);

    // Put the sniffed bytes back in front of the rest of the file
    let reader = std::io::Cursor::new(head).chain(file);
    let body = Body::from_stream(ReaderStream::new(reader));

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_LENGTH, metadata.len().to_string()),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
    ];

    Ok((headers, body).into_response())
}
