//! Meal photo hosting.
//!
//! Photos are handed to an [`ImageHost`], which returns the URL (or local
//! path) to record. Cloudinary is used when configured; otherwise photos are
//! copied into the local images directory. A failed upload never blocks
//! logging the meal: the photo is recorded without a location.

mod cloudinary;
mod local;

pub use cloudinary::CloudinaryHost;
pub use local::LocalImageHost;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Supported photo formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image.
    Jpeg,
    /// PNG image.
    Png,
}

impl ImageFormat {
    /// Format implied by a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Check that `bytes` start with this format's signature.
    #[must_use]
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(JPEG_MAGIC),
            Self::Png => bytes.starts_with(PNG_MAGIC),
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// A validated photo ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    bytes: Vec<u8>,
    format: ImageFormat,
    photo_ref: String,
}

impl PhotoUpload {
    /// Wrap image bytes, checking they match `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhoto`] if the bytes are not a `format` image.
    pub fn from_bytes(bytes: Vec<u8>, format: ImageFormat) -> Result<Self> {
        if !format.matches(&bytes) {
            return Err(Error::InvalidPhoto {
                path: PathBuf::from("<memory>"),
                message: format!("content is not a {} image", format.extension()),
            });
        }
        let photo_ref = blake3::hash(&bytes).to_hex().to_string();
        Ok(Self {
            bytes,
            format,
            photo_ref,
        })
    }

    /// Read a photo from disk.
    ///
    /// Only `.jpg`, `.jpeg` and `.png` files whose contents match their
    /// extension and that are no larger than `max_bytes` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhoto`] if the file is rejected, or
    /// [`Error::IoFailure`] if it cannot be read.
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self> {
        let invalid = |message: String| Error::InvalidPhoto {
            path: path.to_path_buf(),
            message,
        };

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| invalid("expected a .jpg, .jpeg or .png file".to_string()))?;

        let size = std::fs::metadata(path)
            .map_err(|e| Error::io_failure(path, e))?
            .len();
        if size > max_bytes {
            return Err(invalid(format!("{size} bytes exceeds limit of {max_bytes}")));
        }

        let bytes = std::fs::read(path).map_err(|e| Error::io_failure(path, e))?;
        debug!("Read {} byte photo from {}", bytes.len(), path.display());
        Self::from_bytes(bytes, format).map_err(|err| match err {
            Error::InvalidPhoto { message, .. } => invalid(message),
            other => other,
        })
    }

    /// The image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The image format.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// BLAKE3 hex hash of the bytes, used to link meals and photo records.
    #[must_use]
    pub fn photo_ref(&self) -> &str {
        &self.photo_ref
    }

    /// File name the photo is stored under: `<photo_ref>.<ext>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.photo_ref, self.format.extension())
    }
}

/// Somewhere a photo can be stored, returning its location.
#[async_trait]
pub trait ImageHost: Send + Sync + std::fmt::Debug {
    /// Name of this host (for logging).
    fn name(&self) -> &'static str;

    /// Store the photo and return its URL or path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UploadFailure`] if the host rejects or cannot be
    /// reached.
    async fn upload(&self, photo: &PhotoUpload) -> Result<String>;
}

/// Pick the image host for a configuration.
///
/// Cloudinary when configured, the local images directory otherwise, or none
/// when photos are disabled.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn host_from_config(config: &Config) -> Result<Option<Box<dyn ImageHost>>> {
    if !config.photos.enabled {
        return Ok(None);
    }
    if let Some(host) = CloudinaryHost::from_config(&config.cloudinary)? {
        return Ok(Some(Box::new(host)));
    }
    Ok(Some(Box::new(LocalImageHost::new(config.images_dir()))))
}

/// Upload a photo, treating failure as "no location".
///
/// Upload errors are logged and swallowed.
pub async fn publish(host: Option<&dyn ImageHost>, photo: &PhotoUpload) -> Option<String> {
    let host = host?;
    match host.upload(photo).await {
        Ok(url) => {
            debug!("Stored photo {} via {}", photo.photo_ref(), host.name());
            Some(url)
        }
        Err(e) => {
            warn!("Photo {} not stored: {}", photo.photo_ref(), e);
            None
        }
    }
}
