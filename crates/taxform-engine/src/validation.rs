//! Field validation
//!
//! Rules, per visible field in template order:
//! - `readonly_note` fields are never checked
//! - a missing value (`null`, undefined, empty string) is a required error,
//!   and no further rule runs for that field
//! - `email` fields must hold a string matching the configured pattern
//!
//! Validation failures are entries in an [`ErrorMap`], never `Err`.

use crate::config::{EngineConfig, MessageTemplates, DEFAULT_EMAIL_PATTERN};
use crate::error::ConfigError;
use crate::visibility::VisibleFieldIds;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use taxform_schema::{FormData, FormField, FormTemplate, FormValue, InputType};

/// Field id → human-readable message, in template order
pub type ErrorMap = IndexMap<String, String>;

static DEFAULT_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_EMAIL_PATTERN).expect("default email pattern compiles"));

/// Whether a value counts as missing. `0` and `false` are present.
#[must_use]
pub fn is_missing(value: Option<&FormValue>) -> bool {
    match value {
        None | Some(FormValue::Null) => true,
        Some(FormValue::Text(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Compiled validation rules
#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
    messages: MessageTemplates,
}

impl Validator {
    /// Validator with default rules and messages
    #[must_use]
    pub fn new() -> Self {
        Self {
            email: DEFAULT_EMAIL.clone(),
            messages: MessageTemplates::default(),
        }
    }

    /// Compile a validator from configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let email = Regex::new(&config.email_pattern).map_err(|source| {
            ConfigError::InvalidEmailPattern {
                pattern: config.email_pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            email,
            messages: config.messages.clone(),
        })
    }

    /// Whether a value is an acceptable email address
    #[must_use]
    pub fn is_valid_email(&self, value: &FormValue) -> bool {
        value.as_str().is_some_and(|s| self.email.is_match(s))
    }

    /// Error for a single visible field, if any
    #[must_use]
    pub fn check_field(&self, field: &FormField, value: Option<&FormValue>) -> Option<String> {
        if field.input_type == InputType::ReadonlyNote {
            return None;
        }
        let Some(value) = value.filter(|v| !is_missing(Some(*v))) else {
            return Some(self.messages.required(&field.label));
        };
        match field.input_type {
            InputType::Email if !self.is_valid_email(value) => {
                Some(self.messages.invalid_email(&field.label))
            }
            _ => None,
        }
    }

    /// Build a fresh error map for the visible fields.
    ///
    /// An absent template has no fields and therefore no errors.
    #[must_use]
    pub fn collect_errors(
        &self,
        template: Option<&FormTemplate>,
        data: &FormData,
        visible: &VisibleFieldIds,
    ) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let Some(template) = template else {
            return errors;
        };
        for field in template.fields() {
            if !visible.contains(&field.id) {
                continue;
            }
            if let Some(message) = self.check_field(field, data.get(&field.id)) {
                errors.insert(field.id.clone(), message);
            }
        }
        errors
    }

    /// Replace `errors` wholesale and report whether the form is valid
    pub fn validate(
        &self,
        template: Option<&FormTemplate>,
        data: &FormData,
        visible: &VisibleFieldIds,
        errors: &mut ErrorMap,
    ) -> bool {
        *errors = self.collect_errors(template, data, visible);
        tracing::debug!(
            template = template.map_or("<none>", |t| t.id.as_str()),
            visible = visible.len(),
            errors = errors.len(),
            "validated form"
        );
        errors.is_empty()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
