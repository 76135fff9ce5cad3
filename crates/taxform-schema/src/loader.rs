//! Loading templates and form snapshots from JSON or YAML
//!
//! Format is chosen explicitly or from the file extension.

use crate::error::{TemplateError, TemplateResult};
use crate::template::FormTemplate;
use crate::value::FormData;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// File extensions handled by this format
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Yaml => &["yaml", "yml"],
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> TemplateResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        [Self::Json, Self::Yaml]
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
            .ok_or(TemplateError::UnsupportedExtension(ext))
    }

    /// Parse a document in this format
    pub fn parse<T: DeserializeOwned>(self, input: &str) -> TemplateResult<T> {
        match self {
            Self::Json => Ok(serde_json::from_str(input)?),
            Self::Yaml => Ok(serde_yaml::from_str(input)?),
        }
    }
}

fn load_document<T: DeserializeOwned>(path: &Path) -> TemplateResult<T> {
    let format = DocumentFormat::from_path(path)?;
    let input = std::fs::read_to_string(path).map_err(|e| TemplateError::io_error(path, e))?;
    let document = format.parse(&input)?;
    tracing::debug!(path = %path.display(), ?format, "loaded document");
    Ok(document)
}

fn parse_data(format: DocumentFormat, input: &str) -> TemplateResult<FormData> {
    let data: Option<FormData> = format.parse(input)?;
    Ok(data.unwrap_or_default())
}

impl FormTemplate {
    /// Parse a JSON template
    pub fn from_json_str(input: &str) -> TemplateResult<Self> {
        DocumentFormat::Json.parse(input)
    }

    /// Parse a YAML template
    pub fn from_yaml_str(input: &str) -> TemplateResult<Self> {
        DocumentFormat::Yaml.parse(input)
    }

    /// Load a template file, choosing the format from its extension
    pub fn load(path: impl AsRef<Path>) -> TemplateResult<Self> {
        load_document(path.as_ref())
    }
}

impl FormData {
    /// Parse a JSON snapshot; `null` is an empty form
    pub fn from_json_str(input: &str) -> TemplateResult<Self> {
        parse_data(DocumentFormat::Json, input)
    }

    /// Parse a YAML snapshot; an empty or `null` document is an empty form
    pub fn from_yaml_str(input: &str) -> TemplateResult<Self> {
        parse_data(DocumentFormat::Yaml, input)
    }

    /// Load a snapshot file, choosing the format from its extension
    pub fn load(path: impl AsRef<Path>) -> TemplateResult<Self> {
        let data: Option<Self> = load_document(path.as_ref())?;
        Ok(data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FormValue;
    use std::path::PathBuf;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("a/form.JSON")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("form.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(matches!(
            DocumentFormat::from_path(&PathBuf::from("form.toml")),
            Err(TemplateError::UnsupportedExtension(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn yaml_template_parses() {
        let template = FormTemplate::from_yaml_str(
            r"
_id: yaml-form
yearOfAssessment: 2023/2024
pages:
  - title: Main
    sections:
      - title: Basics
        fields:
          - id: name
            label: Name
            inputType: text
",
        )
        .unwrap();
        assert_eq!(template.id, "yaml-form");
        assert_eq!(template.year_of_assessment.as_deref(), Some("2023/2024"));
        assert_eq!(template.field_count(), 1);
    }

    #[test]
    fn yaml_form_data_parses() {
        let data = FormData::from_yaml_str("age: 0\nname: ''\nspouse: null\n").unwrap();
        assert_eq!(data.get("age"), Some(&FormValue::Number(0.0)));
        assert_eq!(data.get("name"), Some(&FormValue::Text(String::new())));
        assert_eq!(data.get("spouse"), Some(&FormValue::Null));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            FormTemplate::from_json_str("{ not json"),
            Err(TemplateError::Json(_))
        ));
    }

    #[test]
    fn object_value_in_form_data_is_kept_raw() {
        let data = FormData::from_json_str(r#"{"address": {"city": "Kandy"}, "tin": "1"}"#).unwrap();
        assert_eq!(data.get("address").map(FormValue::kind), Some("raw"));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn null_snapshot_is_empty_form() {
        assert!(FormData::from_json_str("null").unwrap().is_empty());
        assert!(FormData::from_yaml_str("").unwrap().is_empty());
        assert!(FormData::from_yaml_str("~").unwrap().is_empty());
    }

    #[test]
    fn non_map_snapshot_is_an_error() {
        assert!(matches!(
            FormData::from_json_str("[1, 2]"),
            Err(TemplateError::Json(_))
        ));
    }
}
