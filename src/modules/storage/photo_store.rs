//! Filesystem photo store
//!
//! Saves uploaded photos under server-generated names of the form
//! `{YYYYmmdd_HHMMSS}_{sanitized original name}` and removes them again.
//! Every operation takes a stored name, never a path.

use chrono::Local;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::shared::constants::PHOTO_TIMESTAMP_FORMAT;
use crate::shared::validation::sanitize_filename;

/// Upper bound on name discriminators tried within a single second
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Photo storage rooted at a single upload directory
#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it doesn't exist
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        debug!("Upload directory ready: {}", self.dir.display());
        Ok(())
    }

    /// Resolve a stored name to its path inside the upload directory
    ///
    /// Rejects anything that is not a single plain path component. Dots inside
    /// a name (`foto..jpg`) are fine; only `.` and `..` themselves are not.
    pub fn path(&self, stored_name: &str) -> Result<PathBuf> {
        let is_flat = !stored_name.is_empty()
            && stored_name != "."
            && stored_name != ".."
            && !stored_name.contains(['/', '\\']);

        if !is_flat {
            return Err(AppError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid stored photo name: {:?}", stored_name),
            )));
        }

        Ok(self.dir.join(stored_name))
    }

    /// Write a new photo and return its stored name
    ///
    /// The file is created exclusively and synced before the name is returned,
    /// so a returned name always refers to a complete file.
    pub async fn save(&self, original_filename: &str, bytes: &[u8]) -> Result<String> {
        let timestamp = Local::now().format(PHOTO_TIMESTAMP_FORMAT).to_string();
        let safe_name = sanitize_filename(original_filename);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let stored_name = if attempt == 0 {
                format!("{}_{}", timestamp, safe_name)
            } else {
                format!("{}_{}_{}", timestamp, attempt, safe_name)
            };
            let path = self.path(&stored_name)?;

            let file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let mut file = match file {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Photo name taken, retrying: {}", stored_name);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(bytes).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&path).await {
                    warn!(
                        "Failed to remove partial photo {}: {}",
                        path.display(),
                        cleanup
                    );
                }
                return Err(e.into());
            }

            info!("Photo saved: name={}, size={}", stored_name, bytes.len());
            return Ok(stored_name);
        }

        Err(AppError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("No free photo name for {:?}", safe_name),
        )))
    }

    /// Remove a photo; a photo that is already gone counts as removed
    pub async fn delete(&self, stored_name: &str) -> Result<()> {
        let path = self.path(stored_name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Photo deleted: {}", stored_name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Photo already absent: {}", stored_name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, stored_name: &str) -> bool {
        match self.path(stored_name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
