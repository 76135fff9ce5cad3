//! Engine configuration
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! email_pattern = '^[^\s@]+@[^\s@]+\.[^\s@]+$'
//! markers_enabled = true
//!
//! [messages]
//! required = "{label} is required."
//! invalid_email = "{label} must be a valid email."
//! ```

use crate::error::ConfigError;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lenient `local@domain.tld` check
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Placeholder substituted with the field label in messages
pub const LABEL_PLACEHOLDER: &str = "{label}";

/// Form engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Regex an email field must match
    pub email_pattern: String,
    /// Error message templates
    pub messages: MessageTemplates,
    /// Whether performance markers record anything
    pub markers_enabled: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With email pattern
    #[inline]
    #[must_use]
    pub fn with_email_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.email_pattern = pattern.into();
        self
    }

    /// With message templates
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: MessageTemplates) -> Self {
        self.messages = messages;
        self
    }

    /// With markers enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_markers_enabled(mut self, enabled: bool) -> Self {
        self.markers_enabled = enabled;
        self
    }

    /// Parse TOML configuration
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Compile into a validator
    pub fn validator(&self) -> Result<Validator, ConfigError> {
        Validator::from_config(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            messages: MessageTemplates::default(),
            markers_enabled: true,
        }
    }
}

/// Error message templates; `{label}` is replaced with the field label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    /// Missing required value
    pub required: String,
    /// Malformed email address
    pub invalid_email: String,
}

impl MessageTemplates {
    /// Message for a missing value
    #[must_use]
    pub fn required(&self, label: &str) -> String {
        self.required.replace(LABEL_PLACEHOLDER, label)
    }

    /// Message for a malformed email
    #[must_use]
    pub fn invalid_email(&self, label: &str) -> String {
        self.invalid_email.replace(LABEL_PLACEHOLDER, label)
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            required: "{label} is required.".to_string(),
            invalid_email: "{label} must be a valid email.".to_string(),
        }
    }
}
