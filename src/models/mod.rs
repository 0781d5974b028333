use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const CLIENT_TOOL_VERSION: &str = "1.0.0";
pub const UPLOAD_FORM_FIELD: &str = "file";
pub const AUTHORIZATION_PLACEHOLDER: &str = "YOUR-UPLOAD-PASSWORD-HERE";

/// Custom uploader descriptor understood by ShareX-style client tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ClientToolConfig {
    pub name: String,
    pub version: String,
    pub destination_type: String,
    pub request_method: String,
    #[serde(rename = "RequestURL")]
    pub request_url: String,
    pub body: String,
    pub file_form_name: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "DeletionURL")]
    pub deletion_url: String,
    pub headers: ClientToolHeaders,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClientToolHeaders {
    #[serde(rename = "Authorization")]
    pub authorization: String,
    #[serde(rename = "X-Use-Original-Filename")]
    pub use_original_filename: u8,
}

impl ClientToolConfig {
    /// Descriptor for the uploader reachable at `host`, posting to `request_url`.
    /// Response fields are left as `$json:…$` placeholders for the client to fill.
    pub fn new(host: &str, request_url: &str) -> Self {
        Self {
            name: format!("{} (File uploader)", host),
            version: CLIENT_TOOL_VERSION.to_string(),
            destination_type: "ImageUploader, FileUploader".to_string(),
            request_method: "POST".to_string(),
            request_url: request_url.to_string(),
            body: "MultipartFormData".to_string(),
            file_form_name: UPLOAD_FORM_FIELD.to_string(),
            url: "$json:url$".to_string(),
            deletion_url: "$json:delete_url$".to_string(),
            headers: ClientToolHeaders {
                authorization: AUTHORIZATION_PLACEHOLDER.to_string(),
                use_original_filename: 1,
            },
            error_message: "$json:status$".to_string(),
        }
    }
}
