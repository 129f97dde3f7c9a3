use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

const FALLBACK_FILE_NAME: &str = "upload";

/// Flat directory of uploaded files
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: Option<usize>,
}

impl UploadStore {
    /// Store with no request body limit
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            max_bytes: None,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: Option<usize>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Upper bound on an upload request body. `None` means unlimited.
    pub fn max_bytes(&self) -> Option<usize> {
        self.max_bytes
    }

    /// Writes `bytes` under a timestamp-prefixed name and returns that name
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            warn!(error = %e, dir = %self.dir.display(), "Failed to create upload directory");
            AppError::Io(e)
        })?;

        let file_name = stored_file_name(Utc::now().timestamp_millis(), original_name);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            warn!(error = %e, path = %path.display(), "Failed to write upload");
            AppError::Io(e)
        })?;

        debug!(file_name = %file_name, "Upload written to disk");
        Ok(file_name)
    }
}

/// `<millis>-<name>`, where name is the final path component of the client's
/// file name so nothing escapes the upload directory
fn stored_file_name(millis: i64, original_name: Option<&str>) -> String {
    let base = original_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_FILE_NAME);

    format!("{}-{}", millis, base)
}
