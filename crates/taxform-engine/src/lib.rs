//! Taxform Engine
//!
//! Runtime behaviour for schema-driven forms:
//! - Decides which fields are visible from `show_if` conditions
//! - Validates visible fields into a per-field error map
//! - Edits keyed item lists with unique keys
//! - Times named operations for diagnostics
//!
//! # Example
//!
//! ```rust
//! use taxform_engine::FormSession;
//! use taxform_schema::prelude::*;
//!
//! let template = FormTemplate::new("individual-2024").with_page(
//!     FormPage::new("Main").with_section(
//!         FormSection::new("Family")
//!             .with_field(FormField::new("married", "Married", InputType::Text))
//!             .with_field(
//!                 FormField::new("spouse_name", "Spouse name", InputType::Text)
//!                     .show_if(ShowIf::equals("married", "yes")),
//!             ),
//!     ),
//! );
//!
//! let mut session = FormSession::new(template, FormData::new());
//! session.set_value("married", "no");
//! assert!(session.validate());
//!
//! session.set_value("married", "yes");
//! assert!(!session.validate());
//! assert_eq!(session.error("spouse_name"), Some("Spouse name is required."));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod item_list;
pub mod markers;
pub mod session;
pub mod validation;
pub mod visibility;

// Re-exports
pub use config::{EngineConfig, MessageTemplates, DEFAULT_EMAIL_PATTERN};
pub use error::{ConfigError, EngineError, EngineResult};
pub use item_list::ItemListEditor;
pub use markers::MarkerRegistry;
pub use session::{FormChange, FormObserver, FormSession, SessionView, SubscriptionId};
pub use validation::{is_missing, ErrorMap, Validator};
pub use visibility::{evaluate, is_field_visible, is_visible, strictly_equal, visible_field_ids, VisibleFieldIds};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running forms
    pub use crate::{
        EngineConfig, ErrorMap, FormChange, FormSession, ItemListEditor, Validator,
        VisibleFieldIds,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
