// Public API - what other modules can use
pub use handlers::upload_file;
pub use storage::UploadStore;

// Internal modules
mod handlers;
mod storage;
pub mod types;

/// Multipart field the upload endpoint reads
pub const UPLOAD_FIELD: &str = "file";

/// URL prefix uploaded files are served under
pub const UPLOAD_URL_PREFIX: &str = "/uploads";
