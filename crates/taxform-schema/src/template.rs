//! Form template model
//!
//! A template is the static description of a form: pages contain sections,
//! sections contain fields. The engine only ever reads it.

use crate::condition::ShowIf;
use serde::{Deserialize, Deserializer, Serialize};

/// Static page → section → field schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    /// Template identifier
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tax year the template applies to, e.g. `2024/2025`
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_of_assessment: Option<String>,
    /// Ordered pages
    #[serde(default)]
    pub pages: Vec<FormPage>,
}

impl FormTemplate {
    /// Create an empty template
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With a page appended
    #[inline]
    #[must_use]
    pub fn with_page(mut self, page: FormPage) -> Self {
        self.pages.push(page);
        self
    }

    /// With the year of assessment
    #[inline]
    #[must_use]
    pub fn with_year_of_assessment(mut self, year: impl Into<String>) -> Self {
        self.year_of_assessment = Some(year.into());
        self
    }

    /// Every field in template order (pages, then sections, then fields)
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.pages
            .iter()
            .flat_map(|page| page.sections.iter())
            .flat_map(|section| section.fields.iter())
    }

    /// Find a field by id
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields().find(|f| f.id == id)
    }

    /// Number of fields across all pages
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Whether the template has no fields at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

/// One page of a multi-page form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormPage {
    /// Page identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Ordered sections
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

impl FormPage {
    /// Create a page
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// With a section appended
    #[inline]
    #[must_use]
    pub fn with_section(mut self, section: FormSection) -> Self {
        self.sections.push(section);
        self
    }
}

/// Group of fields within a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    /// Section identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Section title
    #[serde(default)]
    pub title: String,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl FormSection {
    /// Create a section
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// With a field appended
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Declarative description of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Unique within the template
    pub id: String,
    /// Human-readable label, also used in error messages
    #[serde(default)]
    pub label: String,
    /// Input widget type
    #[serde(default)]
    pub input_type: InputType,
    /// Visibility condition
    #[serde(rename = "show_if", default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
    /// Item layout for `itemList` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_structure: Option<ItemStructure>,
    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FormField {
    /// Create a field definition
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, input_type: InputType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            input_type,
            show_if: None,
            item_structure: None,
            placeholder: None,
        }
    }

    /// Attach a visibility condition
    #[must_use]
    pub fn show_if(mut self, show_if: ShowIf) -> Self {
        self.show_if = Some(show_if);
        self
    }

    /// Attach an item structure
    #[must_use]
    pub fn item_structure(mut self, structure: ItemStructure) -> Self {
        self.item_structure = Some(structure);
        self
    }

    /// Whether this is a repeating item list
    #[inline]
    #[must_use]
    pub fn is_item_list(&self) -> bool {
        self.input_type == InputType::ItemList
    }
}

/// Input widget types.
///
/// Types the engine has no rules for are kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputType {
    /// Single-line text
    #[default]
    Text,
    /// Email address, format-checked
    Email,
    /// Numeric input
    Number,
    /// Display-only note, never validated
    ReadonlyNote,
    /// Repeating keyed items
    ItemList,
    /// Opaque to the engine
    Other(String),
}

impl InputType {
    /// Template spelling
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::ReadonlyNote => "readonly_note",
            Self::ItemList => "itemList",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for InputType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "number" => Self::Number,
            "readonly_note" => Self::ReadonlyNote,
            "itemList" => Self::ItemList,
            _ => Self::Other(s),
        }
    }
}

impl From<InputType> for String {
    fn from(input_type: InputType) -> Self {
        match input_type {
            InputType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Layout of each item in an `itemList` field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStructure {
    /// The key selector
    pub key: KeySpec,
    /// Sub-fields filled in per item
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl ItemStructure {
    /// Structure with the given key options and no sub-fields
    #[must_use]
    pub fn with_keys<I, S>(label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: KeySpec {
                label: label.into(),
                options: options.into_iter().map(KeyOption::new).collect(),
            },
            fields: Vec::new(),
        }
    }

    /// With a sub-field appended
    #[must_use]
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Key selector of an item list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Label of the selector
    #[serde(default)]
    pub label: String,
    /// Bounded set of keys, in display order
    #[serde(default)]
    pub options: Vec<KeyOption>,
}

/// One selectable key.
///
/// Templates may write options as bare strings or as `{ value, label }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawKeyOption")]
pub struct KeyOption {
    /// Stored key
    pub value: String,
    /// Display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl KeyOption {
    /// Option whose label is its value
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    /// Label for display, falling back to the value
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeyOption {
    Plain(String),
    Labelled {
        value: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<RawKeyOption> for KeyOption {
    fn from(raw: RawKeyOption) -> Self {
        match raw {
            RawKeyOption::Plain(value) => Self::new(value),
            RawKeyOption::Labelled { value, label } => Self { value, label },
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Year>::deserialize(deserializer)?.map(|year| match year {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
    }))
}
