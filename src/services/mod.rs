pub mod upload_source;
pub mod uploaded_file;
