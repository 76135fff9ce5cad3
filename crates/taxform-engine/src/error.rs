//! Error types for the form engine
//!
//! Evaluation itself never fails. Errors only come from the boundary:
//! - Reading and compiling engine configuration
//! - Loading templates and form data for a session

use std::path::PathBuf;
use taxform_schema::TemplateError;

/// Errors reading or compiling engine configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during config read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("config syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Email pattern does not compile
    #[error("invalid email pattern '{pattern}': {source}")]
    InvalidEmailPattern {
        /// Pattern as configured
        pattern: String,
        /// Compile failure
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded or compiled
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Template or form data could not be loaded
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type alias for engine boundary operations
pub type EngineResult<T> = Result<T, EngineError>;
