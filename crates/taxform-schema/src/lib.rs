//! Taxform Schema
//!
//! Static form templates and the tagged values a form session holds.
//!
//! # Overview
//!
//! - **FormTemplate**: pages → sections → fields, read-only for the engine
//! - **ShowIf**: condition tree deciding a field's visibility
//! - **FormValue / FormData**: tagged values keyed by field id
//! - **lint_template**: structural checks for template authors
//!
//! # Example
//!
//! ```rust
//! use taxform_schema::{FormData, FormTemplate, FormValue};
//!
//! let template = FormTemplate::from_json_str(r#"{
//!     "_id": "individual-2024",
//!     "pages": [{ "title": "Main", "sections": [{ "title": "Contact", "fields": [
//!         { "id": "email", "label": "Email", "inputType": "email" }
//!     ]}]}]
//! }"#).unwrap();
//!
//! let mut data = FormData::new();
//! data.set("email", "taxpayer@example.com");
//!
//! assert_eq!(template.field_count(), 1);
//! assert_eq!(data.get("email").and_then(FormValue::as_str), Some("taxpayer@example.com"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod condition;
pub mod error;
pub mod lint;
pub mod loader;
pub mod template;
pub mod value;

// Re-exports
pub use condition::{Condition, ConditionOperator, ShowIf};
pub use error::{TemplateError, TemplateResult};
pub use lint::{lint_template, TemplateIssue};
pub use loader::DocumentFormat;
pub use template::{
    FormField, FormPage, FormSection, FormTemplate, InputType, ItemStructure, KeyOption, KeySpec,
};
pub use value::{FormData, FormValue, ItemRecord};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and reading templates
    pub use crate::{
        FormData, FormField, FormPage, FormSection, FormTemplate, FormValue, InputType,
        ItemRecord, ItemStructure, ShowIf,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
