use crate::config::UploadConfig;
use crate::models::ClientToolConfig;
use crate::services::upload_source::UploadSource;
use crate::utils::path::safe_join;
use crate::utils::token::token_urlsafe;
use crate::utils::validation::{sanitize_filename, split_extension};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid upload: {0}")]
    InvalidInput(String),

    #[error("Path escapes the upload directory: {0}")]
    PathTraversal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves `name` under `base`, turning an escape into [`UploadError::PathTraversal`].
fn resolve(base: &Path, name: &str) -> Result<PathBuf, UploadError> {
    safe_join(base, name).ok_or_else(|| {
        warn!("Path traversal attempt rejected: {:?}", name);
        UploadError::PathTraversal(name.to_string())
    })
}

/// One incoming upload on its way to disk.
///
/// Created per request. The stored name is decided lazily by
/// [`UploadedFile::assigned_name`] and stays fixed for the life of the value:
/// extensions listed in `tokenized_extensions` get a random token, every
/// other extension keeps the sanitized client name, suffixed `_0`, `_1`, …
/// until it no longer collides.
pub struct UploadedFile {
    source: Box<dyn UploadSource>,
    config: Arc<UploadConfig>,
    filename: String,
    base_name: String,
    extension: String,
    custom_filename: Option<String>,
    use_original_name: bool,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .field("custom_filename", &self.custom_filename)
            .field("use_original_name", &self.use_original_name)
            .finish_non_exhaustive()
    }
}

impl UploadedFile {
    /// Wraps `source`, sanitizing its client filename.
    ///
    /// Fails with [`UploadError::InvalidInput`] when the filename has no
    /// usable characters left after sanitization.
    pub fn new(
        source: impl UploadSource + 'static,
        config: Arc<UploadConfig>,
    ) -> Result<Self, UploadError> {
        let filename = sanitize_filename(source.original_filename());
        if filename.is_empty() {
            return Err(UploadError::InvalidInput(format!(
                "filename {:?} contains no usable characters",
                source.original_filename()
            )));
        }

        let (base_name, extension) = split_extension(&filename);
        let (base_name, extension) = (base_name.to_string(), extension.to_string());

        Ok(Self {
            source: Box::new(source),
            config,
            filename,
            base_name,
            extension,
            custom_filename: None,
            use_original_name: false,
        })
    }

    /// Sanitized, lowercased client filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Extension including its leading dot, or empty.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn use_original_name(&self) -> bool {
        self.use_original_name
    }

    pub fn set_use_original_name(&mut self, value: bool) {
        self.use_original_name = value;
    }

    /// Overrides the stored name. Only single, non-traversing path
    /// components are accepted.
    pub fn set_custom_filename(&mut self, name: impl Into<String>) -> Result<(), UploadError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(UploadError::InvalidInput(format!(
                "custom filename {:?} is not a plain filename",
                name
            )));
        }
        resolve(&self.config.upload_dir, &name)?;
        self.custom_filename = Some(name);
        Ok(())
    }

    /// Pins the stored name to the collision-free sanitized client name in
    /// the upload directory, regardless of extension.
    pub async fn preserve_original_name(&mut self) -> Result<String, UploadError> {
        self.use_original_name = true;
        if let Some(name) = &self.custom_filename {
            return Ok(name.clone());
        }
        let name = self.unique_filename(&self.config.upload_dir).await?;
        self.custom_filename = Some(name.clone());
        Ok(name)
    }

    /// Name the file is stored under, using the configured token length.
    pub async fn assigned_name(&mut self) -> Result<String, UploadError> {
        let token_length = self.config.token_length;
        self.assigned_name_with(token_length).await
    }

    /// Name the file is stored under. Computed on first call, cached
    /// afterwards; `token_length` only matters for that first call.
    pub async fn assigned_name_with(&mut self, token_length: usize) -> Result<String, UploadError> {
        if let Some(name) = &self.custom_filename {
            return Ok(name.clone());
        }

        let name = if self.config.is_tokenized(&self.extension) {
            format!("{}{}", token_urlsafe(token_length), self.extension)
        } else {
            self.unique_filename(&self.config.upload_dir).await?
        };

        debug!("Assigned name {} for upload {}", name, self.filename);
        self.custom_filename = Some(name.clone());
        Ok(name)
    }

    /// First of `base.ext`, `base_0.ext`, `base_1.ext`, … with no existing
    /// entry in `save_directory`. Check-then-act: two concurrent callers can
    /// end up with the same answer.
    pub async fn unique_filename(&self, save_directory: &Path) -> Result<String, UploadError> {
        let mut candidate = format!("{}{}", self.base_name, self.extension);
        let mut path = resolve(save_directory, &candidate)?;

        let mut counter: u64 = 0;
        while tokio::fs::try_exists(&path).await? {
            candidate = format!("{}_{}{}", self.base_name, counter, self.extension);
            path = resolve(save_directory, &candidate)?;
            counter += 1;
        }

        Ok(candidate)
    }

    /// Writes the upload into `save_directory`, creating the directory first
    /// when needed. Token names are written without checking for an
    /// existing file.
    pub async fn save(&mut self, save_directory: &Path) -> Result<(), UploadError> {
        if !tokio::fs::metadata(save_directory)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            info!("Creating upload directory {}", save_directory.display());
            tokio::fs::create_dir_all(save_directory).await?;
        }

        let name = self.assigned_name().await?;
        let save_path = resolve(save_directory, &name)?;
        self.source.save_to(&save_path).await?;

        info!(
            "Stored upload {:?} as {}",
            self.source.original_filename(),
            save_path.display()
        );
        Ok(())
    }

    /// Removes `filename` from the configured upload directory.
    /// Returns `false` when there is no regular file by that name.
    pub async fn delete(config: &UploadConfig, filename: &str) -> Result<bool, UploadError> {
        let file_path = resolve(&config.upload_dir, filename)?;

        match tokio::fs::metadata(&file_path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        tokio::fs::remove_file(&file_path).await?;
        info!("Deleted {}", file_path.display());
        Ok(true)
    }

    /// Client tool descriptor for the uploader served at `host`, whose upload
    /// endpoint lives at the absolute `upload_url`.
    pub fn client_tool_config(host: &str, upload_url: &str) -> ClientToolConfig {
        ClientToolConfig::new(host, upload_url)
    }
}
