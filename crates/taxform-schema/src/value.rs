//! Tagged form-data values
//!
//! Form data is an open mapping from field id to a [`FormValue`]. Any JSON
//! value is accepted at the deserialization boundary: shapes the engine has
//! no type for are kept verbatim as [`FormValue::Raw`] and never match a
//! condition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single form value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FormValue {
    /// Explicit `null`
    Null,
    /// Boolean (checkboxes, toggles)
    Bool(bool),
    /// Any numeric input
    Number(f64),
    /// Free text
    Text(String),
    /// Records of an item-list field
    Items(Vec<ItemRecord>),
    /// Objects and non-record arrays, kept as written
    Raw(Value),
}

impl FormValue {
    /// Strict equality with no type coercion.
    ///
    /// Scalars compare by type and value (`NaN` never equals itself). Lists
    /// and raw values have identity semantics and never equal another value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Borrow as text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, if any
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value, if any
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Item records, if this is a list
    #[inline]
    #[must_use]
    pub fn as_items(&self) -> Option<&[ItemRecord]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is `null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Items(_) => "items",
            Self::Raw(_) => "raw",
        }
    }

    /// Whether [`strict_eq`](Self::strict_eq) can ever be true for this value
    #[inline]
    #[must_use]
    pub fn is_comparable(&self) -> bool {
        !matches!(self, Self::Items(_) | Self::Raw(_))
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(n) => Self::Number(n),
                None => Self::Raw(Value::Number(n)),
            },
            Value::String(s) => Self::Text(s),
            Value::Array(_) => match Vec::<ItemRecord>::deserialize(&value) {
                Ok(items) => Self::Items(items),
                Err(e) => {
                    tracing::warn!(error = %e, "list is not a set of item records; keeping it raw");
                    Self::Raw(value)
                }
            },
            Value::Object(_) => {
                tracing::warn!("object is not a form value; keeping it raw");
                Self::Raw(value)
            }
        }
    }
}

impl From<FormValue> for Value {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Null => Value::Null,
            FormValue::Bool(b) => Value::Bool(b),
            FormValue::Number(n) => number_to_json(n),
            FormValue::Text(s) => Value::String(s),
            FormValue::Items(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            FormValue::Raw(value) => value,
        }
    }
}

/// Integral values are written without a fractional part; non-finite
/// values have no JSON form and become `null`.
#[allow(clippy::cast_possible_truncation)]
fn number_to_json(n: f64) -> Value {
    const SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FormValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<ItemRecord>> for FormValue {
    fn from(items: Vec<ItemRecord>) -> Self {
        Self::Items(items)
    }
}

/// One entry of an item-list field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Key drawn from the field's key options; unique within the list
    pub key: String,
    /// Sub-field values
    #[serde(default)]
    pub values: IndexMap<String, FormValue>,
}

impl ItemRecord {
    /// Create an item with empty sub-field values
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: IndexMap::new(),
        }
    }

    /// With a sub-field value
    #[inline]
    #[must_use]
    pub fn with_value(mut self, sub_field_id: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.values.insert(sub_field_id.into(), value.into());
        self
    }
}

impl From<ItemRecord> for Value {
    fn from(item: ItemRecord) -> Self {
        let values: Map<String, Value> = item
            .values
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
        let mut record = Map::new();
        record.insert("key".to_string(), Value::String(item.key));
        record.insert("values".to_string(), Value::Object(values));
        Value::Object(record)
    }
}

/// Mutable mapping from field id to value
///
/// A field with no entry is *undefined*, which is distinct from an entry
/// holding [`FormValue::Null`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: IndexMap<String, FormValue>,
}

impl FormData {
    /// Create empty form data
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a field; `None` means undefined
    #[inline]
    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&FormValue> {
        self.values.get(field_id)
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, field_id: impl Into<String>, value: impl Into<FormValue>) -> Option<FormValue> {
        self.values.insert(field_id.into(), value.into())
    }

    /// Make a field undefined again
    pub fn remove(&mut self, field_id: &str) -> Option<FormValue> {
        self.values.shift_remove(field_id)
    }

    /// Whether the field has any entry (including `null`)
    #[inline]
    #[must_use]
    pub fn contains(&self, field_id: &str) -> bool {
        self.values.contains_key(field_id)
    }

    /// Number of defined fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is defined
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Items of a list field; empty when undefined or not a list
    #[must_use]
    pub fn items(&self, field_id: &str) -> &[ItemRecord] {
        self.get(field_id).and_then(FormValue::as_items).unwrap_or(&[])
    }

    /// Run `f` on the items of a list field and store the result back.
    ///
    /// An undefined, `null`, or non-list slot starts as an empty list; a
    /// non-list value other than `null` is logged before it is replaced.
    pub fn update_items<R>(&mut self, field_id: &str, f: impl FnOnce(&mut Vec<ItemRecord>) -> R) -> R {
        let slot = self
            .values
            .entry(field_id.to_string())
            .or_insert(FormValue::Null);
        let mut items = match std::mem::replace(slot, FormValue::Null) {
            FormValue::Items(items) => items,
            FormValue::Null => Vec::new(),
            other => {
                tracing::warn!(
                    field_id,
                    found = other.kind(),
                    "replacing non-list value in item-list field"
                );
                Vec::new()
            }
        };
        let result = f(&mut items);
        *slot = FormValue::Items(items);
        result
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_eq_has_no_coercion() {
        assert!(FormValue::from("1").strict_eq(&FormValue::from("1")));
        assert!(!FormValue::from("1").strict_eq(&FormValue::from(1_i64)));
        assert!(!FormValue::from(0_i64).strict_eq(&FormValue::from(false)));
        assert!(!FormValue::Null.strict_eq(&FormValue::from("")));
        assert!(FormValue::Null.strict_eq(&FormValue::Null));
    }

    #[test]
    fn strict_eq_nan_and_lists() {
        assert!(!FormValue::Number(f64::NAN).strict_eq(&FormValue::Number(f64::NAN)));
        let items = FormValue::Items(vec![]);
        assert!(!items.strict_eq(&items.clone()));
    }

    #[test]
    fn json_objects_are_kept_raw() {
        let value = FormValue::from(json!({"a": 1}));
        assert_eq!(value, FormValue::Raw(json!({"a": 1})));
        assert!(!value.strict_eq(&value.clone()));
        assert!(!value.is_comparable());
        assert_eq!(Value::from(value), json!({"a": 1}));
    }

    #[test]
    fn json_arrays_become_items() {
        let value = FormValue::from(json!([
            {"key": "salary", "values": {"amount": 1200}},
            {"key": "rent"}
        ]));
        let items = value.as_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].values.get("amount"), Some(&FormValue::Number(1200.0)));
        assert!(items[1].values.is_empty());
    }

    #[test]
    fn non_record_array_is_kept_raw() {
        let value = FormValue::from(json!(["a", "b"]));
        assert_eq!(value, FormValue::Raw(json!(["a", "b"])));
        assert!(value.as_items().is_none());
    }

    #[test]
    fn object_sub_field_keeps_snapshot_loadable() {
        let data: FormData = serde_json::from_value(json!({
            "tin": "123",
            "incomes": [{ "key": "rent", "values": { "address": { "city": "Kandy" } } }]
        }))
        .unwrap();
        assert_eq!(data.get("tin"), Some(&FormValue::from("123")));
        assert_eq!(
            data.items("incomes")[0].values.get("address"),
            Some(&FormValue::Raw(json!({ "city": "Kandy" })))
        );
    }

    #[test]
    fn integral_numbers_serialize_without_fraction() {
        assert_eq!(Value::from(FormValue::Number(3.0)), json!(3));
        assert_eq!(Value::from(FormValue::Number(2.5)), json!(2.5));
        assert_eq!(Value::from(FormValue::Number(f64::INFINITY)), Value::Null);
    }

    #[test]
    fn form_data_distinguishes_null_from_undefined() {
        let data: FormData = serde_json::from_value(json!({"spouse": null})).unwrap();
        assert_eq!(data.get("spouse"), Some(&FormValue::Null));
        assert_eq!(data.get("children"), None);
        assert!(data.contains("spouse"));
    }

    #[test]
    fn update_items_replaces_scalar_slot() {
        let mut data = FormData::new();
        data.set("incomes", "oops");
        let len = data.update_items("incomes", |items| {
            items.push(ItemRecord::new("salary"));
            items.len()
        });
        assert_eq!(len, 1);
        assert_eq!(data.items("incomes").len(), 1);
    }

    #[test]
    fn update_items_keeps_field_position() {
        let mut data: FormData = [("a", FormValue::Null), ("b", FormValue::from(1_i64))]
            .into_iter()
            .collect();
        data.update_items("a", |items| items.push(ItemRecord::new("k")));
        assert_eq!(data.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(data.items("a")[0].key, "k");
    }

    #[test]
    fn items_of_scalar_is_empty() {
        let data: FormData = [("name", "Ann")].into_iter().collect();
        assert!(data.items("name").is_empty());
        assert!(data.items("missing").is_empty());
    }
}
