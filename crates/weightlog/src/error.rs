//! Error types for weightlog.
//!
//! This module defines all error types used throughout the weightlog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::records::RecordKind;

/// The main error type for weightlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// A CSV file (or a row handed to the store) does not match the schema of
    /// its record kind.
    #[error("schema mismatch in {kind} log {path}: {message}")]
    SchemaMismatch {
        /// Record kind whose schema was violated.
        kind: RecordKind,
        /// Path to the offending file.
        path: PathBuf,
        /// Description of the mismatch.
        message: String,
    },

    /// Reading, writing or replacing a log file failed.
    #[error("I/O failure on {path}: {source}")]
    IoFailure {
        /// Path of the file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Record Errors ===
    /// A record failed validation and was not saved.
    #[error("invalid {kind} record: {message}")]
    InvalidRecord {
        /// Kind of the rejected record.
        kind: RecordKind,
        /// Why the record was rejected.
        message: String,
    },

    /// An aggregation request cannot be answered for the given kind.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Description of the problem.
        message: String,
    },

    // === Photo Errors ===
    /// A photo could not be uploaded to its image host.
    #[error("upload to {host} failed: {message}")]
    UploadFailure {
        /// Name of the image host.
        host: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// A photo file was rejected before upload.
    #[error("invalid photo {path}: {message}")]
    InvalidPhoto {
        /// Path of the photo file.
        path: PathBuf,
        /// Why the photo was rejected.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for weightlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(
        kind: RecordKind,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an I/O failure error bound to a path.
    #[must_use]
    pub fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid record error.
    #[must_use]
    pub fn invalid_record(kind: RecordKind, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create an upload failure error.
    #[must_use]
    pub fn upload_failure(host: &'static str, message: impl Into<String>) -> Self {
        Self::UploadFailure {
            host,
            message: message.into(),
        }
    }

    /// Check if this error is a schema mismatch.
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }

    /// Check if this error came from the file system.
    #[must_use]
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Self::IoFailure { .. } | Self::DirectoryCreate { .. })
    }
}
