//! Form session
//!
//! Owns one form's template, data, derived visible set and error map.
//! Every mutation recomputes visibility from the new data and then notifies
//! subscribers; validation always runs against a freshly recomputed visible
//! set.

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineResult};
use crate::item_list::ItemListEditor;
use crate::markers::MarkerRegistry;
use crate::validation::{ErrorMap, Validator};
use crate::visibility::{visible_field_ids, VisibleFieldIds};
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;
use taxform_schema::{FormData, FormTemplate, FormValue, ItemRecord, KeyOption};

const MARK_VISIBILITY: &str = "visibility";
const MARK_VALIDATE: &str = "validate";

/// What changed in a session
#[derive(Debug, Clone, PartialEq)]
pub enum FormChange {
    /// A field value was set
    ValueSet {
        /// Field written
        field_id: String,
    },
    /// A field became undefined
    ValueCleared {
        /// Field removed from the data
        field_id: String,
    },
    /// An item was appended to a list field
    ItemAdded {
        /// The list field
        field_id: String,
        /// Key of the new item
        key: String,
        /// Position of the new item
        index: usize,
    },
    /// An item was removed from a list field
    ItemRemoved {
        /// The list field
        field_id: String,
        /// Key that became available again
        key: String,
        /// Position the item had
        index: usize,
    },
    /// A sub-field of an item was set
    ItemValueSet {
        /// The list field
        field_id: String,
        /// Item position
        index: usize,
        /// Sub-field written
        sub_field_id: String,
    },
    /// Validation ran
    Validated {
        /// Whether the form passed
        valid: bool,
        /// Entries in the new error map
        error_count: usize,
    },
}

/// Read-only view handed to subscribers
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// The template
    pub template: &'a FormTemplate,
    /// Current data
    pub data: &'a FormData,
    /// Visible fields for the current data
    pub visible: &'a VisibleFieldIds,
    /// Errors from the last validation
    pub errors: &'a ErrorMap,
}

/// Receives session changes
pub trait FormObserver {
    /// Called after the change has been applied and visibility recomputed
    fn on_change(&mut self, change: &FormChange, view: &SessionView<'_>);
}

impl<F> FormObserver for F
where
    F: FnMut(&FormChange, &SessionView<'_>),
{
    fn on_change(&mut self, change: &FormChange, view: &SessionView<'_>) {
        self(change, view);
    }
}

/// Handle returned by [`FormSession::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A single form being filled in
pub struct FormSession {
    template: FormTemplate,
    data: FormData,
    validator: Validator,
    visible: VisibleFieldIds,
    errors: ErrorMap,
    editors: IndexMap<String, ItemListEditor>,
    markers: MarkerRegistry,
    observers: Vec<(SubscriptionId, Box<dyn FormObserver>)>,
    next_subscription: u64,
}

impl fmt::Debug for FormSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("template", &self.template.id)
            .field("data", &self.data)
            .field("visible", &self.visible)
            .field("errors", &self.errors)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl FormSession {
    /// Session with default validation rules
    #[must_use]
    pub fn new(template: FormTemplate, data: FormData) -> Self {
        Self::build(template, data, Validator::new(), MarkerRegistry::default())
    }

    /// Session with configured rules
    pub fn with_config(
        template: FormTemplate,
        data: FormData,
        config: &EngineConfig,
    ) -> Result<Self, ConfigError> {
        let validator = config.validator()?;
        Ok(Self::build(
            template,
            data,
            validator,
            MarkerRegistry::new(config.markers_enabled),
        ))
    }

    /// Load template and (optionally) data from files
    pub fn load(
        template_path: impl AsRef<Path>,
        data_path: Option<&Path>,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        let template = FormTemplate::load(template_path)?;
        let data = data_path.map(FormData::load).transpose()?.unwrap_or_default();
        Ok(Self::with_config(template, data, config)?)
    }

    fn build(
        template: FormTemplate,
        data: FormData,
        validator: Validator,
        markers: MarkerRegistry,
    ) -> Self {
        let editors = template
            .fields()
            .filter(|field| field.is_item_list())
            .map(|field| (field.id.clone(), ItemListEditor::new(field)))
            .collect();
        let mut session = Self {
            template,
            data,
            validator,
            visible: VisibleFieldIds::new(),
            errors: ErrorMap::new(),
            editors,
            markers,
            observers: Vec::new(),
            next_subscription: 0,
        };
        session.refresh();
        session
    }

    /// The template
    #[inline]
    #[must_use]
    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    /// Current data
    #[inline]
    #[must_use]
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Consume the session, keeping its data
    #[must_use]
    pub fn into_data(self) -> FormData {
        self.data
    }

    /// Visible fields for the current data
    #[inline]
    #[must_use]
    pub fn visible_field_ids(&self) -> &VisibleFieldIds {
        &self.visible
    }

    /// Whether a field is currently visible
    #[inline]
    #[must_use]
    pub fn is_visible(&self, field_id: &str) -> bool {
        self.visible.contains(field_id)
    }

    /// Errors from the last validation
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Error for one field from the last validation
    #[must_use]
    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    /// Timing registry
    #[inline]
    #[must_use]
    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Recompute the visible set from the current data
    pub fn refresh(&mut self) {
        self.markers.start(MARK_VISIBILITY);
        self.visible = visible_field_ids(Some(&self.template), &self.data);
        self.markers.end(MARK_VISIBILITY);
    }

    /// Set a field value
    pub fn set_value(&mut self, field_id: impl Into<String>, value: impl Into<FormValue>) {
        let field_id = field_id.into();
        self.data.set(field_id.clone(), value);
        self.commit(&FormChange::ValueSet { field_id });
    }

    /// Make a field undefined
    pub fn clear_value(&mut self, field_id: &str) {
        if self.data.remove(field_id).is_some() {
            self.commit(&FormChange::ValueCleared {
                field_id: field_id.to_string(),
            });
        }
    }

    /// Editor for a list field
    #[must_use]
    pub fn editor(&self, field_id: &str) -> Option<&ItemListEditor> {
        self.editors.get(field_id)
    }

    /// Keys still available for a new item; empty for unknown fields
    #[must_use]
    pub fn available_keys(&self, field_id: &str) -> Vec<&KeyOption> {
        self.editors
            .get(field_id)
            .map(|editor| editor.available_keys(&self.data))
            .unwrap_or_default()
    }

    /// Whether the add control of a list field is enabled
    #[must_use]
    pub fn is_add_enabled(&self, field_id: &str) -> bool {
        self.editors
            .get(field_id)
            .is_some_and(|editor| editor.is_add_enabled(&self.data))
    }

    /// Choose the key for the next add on a list field
    pub fn select_key(&mut self, field_id: &str, key: impl Into<String>) {
        if let Some(editor) = self.editors.get_mut(field_id) {
            editor.select_key(key);
        }
    }

    /// Add an item with the selected key
    pub fn add_item(&mut self, field_id: &str) -> Option<usize> {
        let editor = self.editors.get_mut(field_id)?;
        let index = editor.add_item(&mut self.data)?;
        let key = self.data.items(field_id)[index].key.clone();
        self.commit(&FormChange::ItemAdded {
            field_id: field_id.to_string(),
            key,
            index,
        });
        Some(index)
    }

    /// Remove the item at `index`
    pub fn remove_item(&mut self, field_id: &str, index: usize) -> Option<ItemRecord> {
        let removed = self.editors.get(field_id)?.remove_item(&mut self.data, index)?;
        self.commit(&FormChange::ItemRemoved {
            field_id: field_id.to_string(),
            key: removed.key.clone(),
            index,
        });
        Some(removed)
    }

    /// Set a sub-field value of an existing item
    pub fn set_item_value(
        &mut self,
        field_id: &str,
        index: usize,
        sub_field_id: &str,
        value: impl Into<FormValue>,
    ) -> bool {
        let Some(editor) = self.editors.get(field_id) else {
            return false;
        };
        if !editor.set_item_value(&mut self.data, index, sub_field_id, value) {
            return false;
        }
        self.commit(&FormChange::ItemValueSet {
            field_id: field_id.to_string(),
            index,
            sub_field_id: sub_field_id.to_string(),
        });
        true
    }

    /// Validate against the current data, replacing the error map
    pub fn validate(&mut self) -> bool {
        self.refresh();
        self.markers.start(MARK_VALIDATE);
        let valid = self.validator.validate(
            Some(&self.template),
            &self.data,
            &self.visible,
            &mut self.errors,
        );
        self.markers.end(MARK_VALIDATE);
        self.notify(&FormChange::Validated {
            valid,
            error_count: self.errors.len(),
        });
        valid
    }

    /// Register an observer
    pub fn subscribe(&mut self, observer: impl FormObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Start of the view lifecycle: clears stale markers
    pub fn mount(&mut self) {
        self.markers.mount();
        self.refresh();
    }

    /// End of the view lifecycle: returns markers that never ended
    pub fn unmount(&mut self) -> Vec<String> {
        self.markers.unmount()
    }

    fn commit(&mut self, change: &FormChange) {
        self.refresh();
        self.notify(change);
    }

    fn notify(&mut self, change: &FormChange) {
        let view = SessionView {
            template: &self.template,
            data: &self.data,
            visible: &self.visible,
            errors: &self.errors,
        };
        for (_, observer) in &mut self.observers {
            observer.on_change(change, &view);
        }
    }
}
