use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Uploaded files on local disk, keyed by their generated filename.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a stored name to its path. Names containing path separators
    /// are rejected so a record can never point outside the upload directory.
    pub fn path_for(&self, filename: &str) -> AppResult<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(AppError::storage(format!("invalid stored filename: {}", filename)));
        }
        Ok(self.root.join(filename))
    }

    pub async fn save(&self, filename: &str, content: &[u8]) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::storage(format!("Failed to create upload directory: {}", e))
        })?;

        let path = self.path_for(filename)?;
        fs::write(&path, content)
            .await
            .map_err(|e| AppError::storage(format!("Failed to save file: {}", e)))?;

        info!(path = %path.display(), bytes = content.len(), "Stored uploaded file");
        Ok(path)
    }

    pub async fn read(&self, filename: &str) -> AppResult<Vec<u8>> {
        let path = self.path_for(filename)?;
        fs::read(&path)
            .await
            .map_err(|e| AppError::storage(format!("Failed to open file: {}", e)))
    }

    /// Removes a stored file. Returns `false` when it was already gone.
    pub async fn remove(&self, filename: &str) -> AppResult<bool> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted stored file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Stored file already absent");
                Ok(false)
            }
            Err(e) => Err(AppError::storage(format!("Failed to delete file: {}", e))),
        }
    }
}
