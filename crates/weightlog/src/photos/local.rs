//! Local-directory image host.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{ImageHost, PhotoUpload};
use crate::error::{Error, Result};

/// Stores photos as `<photo_ref>.<ext>` files in a directory.
///
/// File names are content hashes, so storing the same photo twice writes it
/// once.
#[derive(Debug, Clone)]
pub struct LocalImageHost {
    dir: PathBuf,
}

impl LocalImageHost {
    /// Create a host writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The images directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn store(&self, photo: &PhotoUpload) -> Result<PathBuf> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = self.dir.join(photo.file_name());
        if path.exists() {
            debug!("Photo already stored at {}", path.display());
        } else {
            std::fs::write(&path, photo.bytes()).map_err(|e| Error::io_failure(&path, e))?;
        }
        Ok(path)
    }
}

#[async_trait]
impl ImageHost for LocalImageHost {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn upload(&self, photo: &PhotoUpload) -> Result<String> {
        self.store(photo)
            .map(|path| path.display().to_string())
            .map_err(|e| Error::upload_failure(self.name(), e.to_string()))
    }
}
