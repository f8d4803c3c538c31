use std::{
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Error types for documentation generation.
///
/// Every failure carries the root, path or format that caused it so a
/// caller can diagnose the run without re-running it. Nothing is retried.
#[derive(Error, Debug)]
pub enum DocgenError {
    /// A scan root is missing, unreadable, or contains no component metadata
    #[error("failed to scan '{root}': {details}")]
    Scan {
        /// Root that failed to scan
        root: PathBuf,
        /// Scan error details
        details: String,
    },

    /// Component metadata is inconsistent or cannot be parsed
    #[error("malformed metadata for '{component}' at '{path}': {details}")]
    MalformedMetadata {
        /// Component (or descriptor file) holding the bad metadata
        component: String,
        /// Property path, or the source location when no property applies
        path: String,
        /// What is wrong with it
        details: String,
    },

    /// The primary document cannot be written
    #[error("failed to write '{path}': {details}")]
    Write {
        /// Destination that could not be written
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// A backend converter failed for a requested format
    #[error("conversion to '{format}' at '{path}' failed: {details}")]
    Conversion {
        /// Requested format name
        format: String,
        /// Requested destination
        path: PathBuf,
        /// Backend error details
        details: String,
    },

    /// Configuration field missing or invalid
    #[error("invalid configuration field '{field}': {details}")]
    ConfigValidation {
        /// The offending field
        field: String,
        /// Why it was rejected
        details: String,
    },

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParse {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },
}

/// A specialized `Result` type for generation operations.
pub type Result<T> = std::result::Result<T, DocgenError>;

impl DocgenError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        DocgenError::TomlParse {
            location,
            details: error.to_string(),
        }
    }

    /// Creates a scan error for the given root.
    pub fn scan(error: impl fmt::Display, root: &Path) -> Self {
        DocgenError::Scan {
            root: root.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates a write error for the given destination.
    pub fn write(error: impl fmt::Display, path: &Path) -> Self {
        DocgenError::Write {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates a malformed metadata error.
    ///
    /// # Arguments
    ///
    /// * `component` - Component or descriptor source holding the metadata
    /// * `path` - Property path the problem was found at
    /// * `details` - Description of the problem
    pub fn malformed(
        component: impl Into<String>,
        path: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        DocgenError::MalformedMetadata {
            component: component.into(),
            path: path.into(),
            details: details.into(),
        }
    }

    /// Creates a conversion error for the given format and destination.
    pub fn conversion(error: impl fmt::Display, format: &str, path: &Path) -> Self {
        DocgenError::Conversion {
            format: format.to_string(),
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
