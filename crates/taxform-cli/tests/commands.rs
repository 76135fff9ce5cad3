//! Command tests against files on disk

use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use taxform_cli::{check, lint, visible};
use taxform_test_utils::sample_return_json;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sample_template(dir: &TempDir) -> PathBuf {
    write(dir, "return.json", &sample_return_json().to_string())
}

#[test]
fn check_reports_errors_for_visible_fields() {
    let dir = TempDir::new().unwrap();
    let template = sample_template(&dir);
    let data = write(
        &dir,
        "data.yaml",
        "tin: '123'\nemail: not-an-email\nmarried: 'yes'\nemployment_type: none\n",
    );

    let report = check(&template, Some(&data), None).unwrap();

    assert!(!report.valid);
    assert_eq!(report.template, "individual-2024");
    assert_eq!(
        report.errors.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
        vec![
            ("email", "Email must be a valid email."),
            ("spouse_tin", "Spouse TIN is required."),
        ]
    );
    assert!(!report.visible.contains(&"other_income".to_string()));
}

#[test]
fn check_honours_config_messages() {
    let dir = TempDir::new().unwrap();
    let template = sample_template(&dir);
    let config = write(&dir, "engine.toml", "[messages]\nrequired = \"Please fill in {label}\"\n");

    let report = check(&template, None, Some(&config)).unwrap();

    assert_eq!(report.errors.get("tin").map(String::as_str), Some("Please fill in TIN"));
}

#[test]
fn check_rejects_bad_email_pattern() {
    let dir = TempDir::new().unwrap();
    let template = sample_template(&dir);
    let config = write(&dir, "engine.toml", "email_pattern = '('\n");

    let err = check(&template, None, Some(&config)).unwrap_err();
    assert!(format!("{err:#}").contains("invalid email pattern"));
}

#[test]
fn visible_without_data_uses_empty_form() {
    let dir = TempDir::new().unwrap();
    let template = sample_template(&dir);

    let ids = visible(&template, None).unwrap();

    assert_eq!(
        ids,
        vec!["tin", "email", "residency_note", "married", "employment_type", "other_income"]
    );
}

#[test]
fn lint_reports_unknown_references() {
    let dir = TempDir::new().unwrap();
    let template = write(
        &dir,
        "broken.yaml",
        r"
_id: broken
pages:
  - title: Main
    sections:
      - title: Main
        fields:
          - id: a
            label: A
            show_if: { fieldId: ghost, operator: equals, value: x }
",
    );

    let findings = lint(&template).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].field_id, "a");
    assert!(findings[0].message.contains("ghost"));
}

#[test]
fn missing_template_is_an_error_with_path() {
    let err = check(std::path::Path::new("/nonexistent/form.json"), None, None).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/form.json"));
}

#[test]
fn check_treats_null_data_as_empty_form() {
    let dir = TempDir::new().unwrap();
    let template = sample_template(&dir);
    let data = write(&dir, "data.json", "null");

    let report = check(&template, Some(&data), None).unwrap();

    assert!(!report.valid);
    assert_eq!(report.errors.get("tin").map(String::as_str), Some("TIN is required."));
}
