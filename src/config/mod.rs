use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

const DEFAULT_TOKENIZED_EXTENSIONS: &[&str] = &[
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp",
    // Video
    ".mp4", ".webm", ".mov",
    // Audio
    ".mp3", ".ogg", ".wav",
];

/// Configuration for the upload service
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded files are stored in (default: "uploads")
    pub upload_dir: PathBuf,

    /// Extensions (with leading dot) that get a random token as stored name
    pub tokenized_extensions: HashSet<String>,

    /// Shared password expected in the Authorization header.
    /// Uploads are open when unset.
    pub upload_password: Option<String>,

    /// Secret mixed into per-file delete keys
    pub delete_secret: String,

    /// Public base URL used for absolute links, e.g. "https://files.example.com"
    pub public_url: Option<String>,

    /// Maximum file size in bytes (default: 256 MB)
    pub max_file_size: usize,

    /// Random bytes used for token names (default: 12)
    pub token_length: usize,

    /// Honor `X-Forwarded-Proto` from a reverse proxy (default: false)
    pub trust_proxy: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            tokenized_extensions: DEFAULT_TOKENIZED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            upload_password: None,
            delete_secret: "change-me".to_string(),
            public_url: None,
            max_file_size: 256 * 1024 * 1024, // 256 MB
            token_length: 12,
            trust_proxy: false,
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            tokenized_extensions: env::var("TOKENIZED_EXTENSIONS")
                .map(|v| parse_extensions(&v))
                .unwrap_or(default.tokenized_extensions),

            upload_password: env::var("UPLOAD_PASSWORD")
                .ok()
                .filter(|v| !v.is_empty()),

            delete_secret: env::var("DELETE_SECRET").unwrap_or(default.delete_secret),

            public_url: env::var("PUBLIC_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            token_length: env::var("TOKEN_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(default.token_length),

            trust_proxy: env::var("TRUST_PROXY")
                .map(|v| parse_bool(&v))
                .unwrap_or(default.trust_proxy),
        }
    }

    /// Config for local development and tests: files go to `upload_dir`,
    /// no password, small size limit.
    pub fn development(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            delete_secret: "dev-secret".to_string(),
            max_file_size: 16 * 1024 * 1024,
            ..Self::default()
        }
    }

    pub fn is_tokenized(&self, extension: &str) -> bool {
        self.tokenized_extensions.contains(extension)
    }
}

/// Parses a comma separated extension list. Values are lowercased and get a
/// leading dot when missing.
pub fn parse_extensions(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && s != ".")
        .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
