use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Capability an incoming upload must provide to be stored.
#[async_trait]
pub trait UploadSource: Send + Sync {
    /// Filename as sent by the client, unsanitized.
    fn original_filename(&self) -> &str;

    /// Writes the payload to `path`, replacing whatever is there.
    async fn save_to(&self, path: &Path) -> std::io::Result<()>;
}

/// Upload whose payload has already been read into memory, e.g. a multipart
/// field collected by the HTTP handler.
#[derive(Debug, Clone)]
pub struct BufferedUpload {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

impl BufferedUpload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl UploadSource for BufferedUpload {
    fn original_filename(&self) -> &str {
        &self.filename
    }

    async fn save_to(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, &self.data).await
    }
}
