//! Keyed item-list editor
//!
//! Manages the array value of one `itemList` field. Every item carries a key
//! from the field's bounded option set, and keys are unique within the list.
//!
//! Uniqueness is structural: the keys offered for a new item are always the
//! configured options minus the keys already in use, so the add path cannot
//! introduce a duplicate. Nothing about availability is stored; it is
//! derived from the current items on every call.

use taxform_schema::{FormData, FormField, FormValue, ItemRecord, KeyOption};

/// Editor state for one item-list field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListEditor {
    field_id: String,
    options: Vec<KeyOption>,
    sub_fields: Vec<String>,
    selected: Option<String>,
}

impl ItemListEditor {
    /// Editor for a field. A field without an item structure has no key
    /// options, so nothing can ever be added.
    #[must_use]
    pub fn new(field: &FormField) -> Self {
        let (options, sub_fields) = field
            .item_structure
            .as_ref()
            .map(|s| {
                (
                    s.key.options.clone(),
                    s.fields.iter().map(|f| f.id.clone()).collect(),
                )
            })
            .unwrap_or_default();
        Self {
            field_id: field.id.clone(),
            options,
            sub_fields,
            selected: None,
        }
    }

    /// Field this editor writes to
    #[inline]
    #[must_use]
    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    /// All configured key options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[KeyOption] {
        &self.options
    }

    /// Current items of the field
    #[inline]
    #[must_use]
    pub fn items<'d>(&self, data: &'d FormData) -> &'d [ItemRecord] {
        data.items(&self.field_id)
    }

    /// Options not used by any existing item, in option order
    #[must_use]
    pub fn available_keys(&self, data: &FormData) -> Vec<&KeyOption> {
        let items = self.items(data);
        self.options
            .iter()
            .filter(|option| !items.iter().any(|item| item.key == option.value))
            .collect()
    }

    /// Whether the add control is enabled
    #[must_use]
    pub fn is_add_enabled(&self, data: &FormData) -> bool {
        !self.available_keys(data).is_empty()
    }

    /// Choose the key for the next add
    pub fn select_key(&mut self, key: impl Into<String>) {
        self.selected = Some(key.into());
    }

    /// Forget the current selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected key
    #[inline]
    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Append `{ key, values: {} }` for the selected key.
    ///
    /// No-op unless a key is selected and still available. Clears the
    /// selection on success and returns the new item's index.
    pub fn add_item(&mut self, data: &mut FormData) -> Option<usize> {
        let Some(key) = self.selected.as_deref() else {
            tracing::debug!(field_id = %self.field_id, "add ignored: no key selected");
            return None;
        };
        if !self.available_keys(data).iter().any(|option| option.value == key) {
            tracing::debug!(field_id = %self.field_id, key, "add ignored: key not available");
            return None;
        }

        let index = data.update_items(&self.field_id, |items| {
            items.push(ItemRecord::new(key));
            items.len() - 1
        });
        tracing::debug!(field_id = %self.field_id, key, index, "item added");
        self.selected = None;
        Some(index)
    }

    /// Remove the item at `index`; its key becomes available again.
    ///
    /// Out-of-range indices are ignored.
    pub fn remove_item(&self, data: &mut FormData, index: usize) -> Option<ItemRecord> {
        let len = self.items(data).len();
        if index >= len {
            tracing::warn!(field_id = %self.field_id, index, len, "remove ignored: index out of range");
            return None;
        }
        let removed = data.update_items(&self.field_id, |items| items.remove(index));
        tracing::debug!(field_id = %self.field_id, key = %removed.key, index, "item removed");
        Some(removed)
    }

    /// Set a sub-field value on an existing item.
    ///
    /// Returns `false` when the index is out of range or the structure
    /// declares no such sub-field.
    pub fn set_item_value(
        &self,
        data: &mut FormData,
        index: usize,
        sub_field_id: &str,
        value: impl Into<FormValue>,
    ) -> bool {
        if !self.sub_fields.iter().any(|id| id == sub_field_id) {
            tracing::debug!(field_id = %self.field_id, sub_field_id, "unknown sub-field");
            return false;
        }
        if index >= self.items(data).len() {
            return false;
        }
        let value = value.into();
        data.update_items(&self.field_id, |items| {
            items
                .get_mut(index)
                .map(|item| item.values.insert(sub_field_id.to_string(), value))
                .is_some()
        })
    }
}
