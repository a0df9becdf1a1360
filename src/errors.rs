//! Custom error types for the CARVER risk register.
//!
//! Validation problems never show up here: bad rating values are clamped
//! and missing text fields are defaulted. What remains are structural
//! parse failures, I/O failures and controller misuse.

use std::path::PathBuf;

/// The main error type for register operations.
#[derive(Debug, thiserror::Error)]
pub enum CarverError {
    /// I/O error (file read/write, permissions, etc.)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Structurally invalid import data
    #[error("{format} parse error at {location}: {message}")]
    Parse {
        format: &'static str,
        location: String,
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimited-text writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Role name outside All/Ops/Sec/Comms
    #[error("Unknown role '{0}' (expected All, Ops, Sec or Comms)")]
    InvalidRole(String),

    /// No record with the given identifier
    #[error("No asset with id {0}")]
    UnknownRecord(String),

    /// Column or field name that is not part of the register
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Key-value store failure
    #[error("Store error for key '{key}': {message}")]
    Store { key: String, message: String },
}

/// Result type alias using CarverError
pub type CarverResult<T> = Result<T, CarverError>;

impl CarverError {
    /// Create an I/O error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error naming where the input went wrong
    pub fn parse(
        format: &'static str,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a store error for a key
    pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from reading or decoding user input, as
    /// opposed to a programming or environment fault.
    pub fn is_import_failure(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Json(_) | Self::Csv(_) | Self::Io { .. }
        )
    }
}

/// Convert from raw I/O errors (without path context)
impl From<std::io::Error> for CarverError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}
