//! Loading templates and snapshots from disk

use pretty_assertions::assert_eq;
use std::fs;
use taxform_schema::{
    lint_template, FormData, FormTemplate, FormValue, InputType, ShowIf, TemplateError,
    TemplateIssue,
};
use tempfile::TempDir;

const TEMPLATE_YAML: &str = r"
_id: rental-2024
name: Rental income schedule
yearOfAssessment: 2024
pages:
  - id: rent
    title: Rent
    sections:
      - title: Properties
        fields:
          - id: owns_property
            label: Owns property
            inputType: text
          - id: properties
            label: Properties
            inputType: itemList
            show_if:
              operator: or
              conditions:
                - { fieldId: owns_property, operator: equals, value: 'yes' }
                - { fieldId: owns_property, operator: equals, value: 'joint' }
            itemStructure:
              key:
                label: Property
                options: [house, land, { value: flat, label: Apartment }]
              fields:
                - { id: rent, label: Annual rent, inputType: number }
";

#[test]
fn yaml_template_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rental.yaml");
    fs::write(&path, TEMPLATE_YAML).unwrap();

    let template = FormTemplate::load(&path).unwrap();

    assert_eq!(template.id, "rental-2024");
    assert_eq!(template.year_of_assessment.as_deref(), Some("2024"));
    let properties = template.field("properties").unwrap();
    assert_eq!(properties.input_type, InputType::ItemList);
    assert!(matches!(properties.show_if, Some(ShowIf::Any(ref children)) if children.len() == 2));

    let options = &properties.item_structure.as_ref().unwrap().key.options;
    let labels: Vec<_> = options.iter().map(|o| o.display_label()).collect();
    assert_eq!(labels, vec!["house", "land", "Apartment"]);
    assert!(lint_template(&template).is_empty());
}

#[test]
fn json_snapshot_from_disk_keeps_undefined_and_null_apart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{
            "owns_property": "yes",
            "spouse": null,
            "properties": [{ "key": "land", "values": { "rent": 360000 } }]
        }"#,
    )
    .unwrap();

    let data = FormData::load(&path).unwrap();

    assert_eq!(data.get("spouse"), Some(&FormValue::Null));
    assert_eq!(data.get("missing"), None);
    assert_eq!(data.items("properties")[0].key, "land");
    assert_eq!(
        data.items("properties")[0].values.get("rent"),
        Some(&FormValue::Number(360_000.0))
    );
}

#[test]
fn nested_objects_keep_snapshot_loadable() {
    let data = FormData::from_json_str(r#"{ "address": { "city": "Kandy" }, "tin": "1" }"#).unwrap();
    assert_eq!(data.get("tin"), Some(&FormValue::from("1")));
    assert!(!data.get("address").unwrap().is_comparable());
}

#[test]
fn null_snapshot_file_is_empty_form() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "null").unwrap();

    assert!(FormData::load(&path).unwrap().is_empty());
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = FormTemplate::load(&path).unwrap_err();

    assert!(matches!(err, TemplateError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn lint_flags_broken_templates() {
    let template = FormTemplate::from_json_str(
        r#"{
            "_id": "broken",
            "pages": [{ "title": "P", "sections": [{ "title": "S", "fields": [
                { "id": "a", "label": "A" },
                { "id": "a", "label": "A again" },
                { "id": "b", "label": "B", "show_if": { "operator": "greater_than", "fieldId": "a", "value": 1 } },
                { "id": "c", "label": "C", "inputType": "itemList" }
            ]}]}]
        }"#,
    )
    .unwrap();

    let ids: Vec<_> = lint_template(&template)
        .iter()
        .map(|issue| (issue.field_id().to_string(), std::mem::discriminant(issue)))
        .collect();

    assert_eq!(ids.len(), 3);
    assert_eq!(
        ids[0].1,
        std::mem::discriminant(&TemplateIssue::DuplicateFieldId { field_id: String::new() })
    );
    assert_eq!(ids[1].0, "b");
    assert_eq!(ids[2].0, "c");
}
