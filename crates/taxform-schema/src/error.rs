//! Error types for the schema layer
//!
//! Only boundary operations fail: reading a template or form data file and
//! parsing it into the model.

use std::path::PathBuf;

/// Errors while loading templates or form data
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON document
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML document
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension has no registered format
    #[error("unsupported template extension: '{0}'")]
    UnsupportedExtension(String),
}

impl TemplateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for loading operations
pub type TemplateResult<T> = Result<T, TemplateError>;
