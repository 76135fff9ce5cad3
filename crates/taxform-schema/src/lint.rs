//! Template lint
//!
//! Evaluation fails open on malformed templates. This pass reports the same
//! anomalies up front so template authors can fix them; it never changes
//! how a template evaluates.

use crate::condition::{ConditionOperator, ShowIf};
use crate::template::{FormField, FormTemplate};
use std::collections::HashSet;

/// A structural problem found in a template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateIssue {
    /// Two fields share an id
    #[error("duplicate field id '{field_id}'")]
    DuplicateFieldId {
        /// Repeated id
        field_id: String,
    },

    /// A `show_if` leaf has no `fieldId`; the field is always visible
    #[error("field '{field_id}': show_if condition has no fieldId")]
    MissingConditionField {
        /// Field owning the condition
        field_id: String,
    },

    /// A `show_if` leaf points at a field that does not exist
    #[error("field '{field_id}': show_if references unknown field '{references}'")]
    UnknownConditionField {
        /// Field owning the condition
        field_id: String,
        /// Id the condition points at
        references: String,
    },

    /// Operator the engine does not evaluate; the field is always visible
    #[error("field '{field_id}': unrecognized show_if operator '{operator}'")]
    UnrecognizedOperator {
        /// Field owning the condition
        field_id: String,
        /// Operator as written
        operator: String,
    },

    /// Expected value is a list or object; `equals` never matches it
    #[error("field '{field_id}': show_if compares against a {kind} value that never matches")]
    UncomparableConditionValue {
        /// Field owning the condition
        field_id: String,
        /// Kind of the expected value
        kind: String,
    },

    /// `or` with no children; the field is never visible
    #[error("field '{field_id}': 'or' condition has no conditions")]
    EmptyAnyCondition {
        /// Field owning the condition
        field_id: String,
    },

    /// `itemList` without an item structure; nothing can be added
    #[error("field '{field_id}': itemList has no itemStructure")]
    MissingItemStructure {
        /// The list field
        field_id: String,
    },

    /// Key option listed twice
    #[error("field '{field_id}': duplicate key option '{key}'")]
    DuplicateKeyOption {
        /// The list field
        field_id: String,
        /// Repeated key
        key: String,
    },
}

impl TemplateIssue {
    /// Field the issue is reported against
    #[must_use]
    pub fn field_id(&self) -> &str {
        match self {
            Self::DuplicateFieldId { field_id }
            | Self::MissingConditionField { field_id }
            | Self::UnknownConditionField { field_id, .. }
            | Self::UnrecognizedOperator { field_id, .. }
            | Self::UncomparableConditionValue { field_id, .. }
            | Self::EmptyAnyCondition { field_id }
            | Self::MissingItemStructure { field_id }
            | Self::DuplicateKeyOption { field_id, .. } => field_id,
        }
    }
}

/// Check a template for structural problems, in template order
#[must_use]
pub fn lint_template(template: &FormTemplate) -> Vec<TemplateIssue> {
    let known: HashSet<&str> = template.fields().map(|f| f.id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for field in template.fields() {
        if !seen.insert(field.id.as_str()) {
            issues.push(TemplateIssue::DuplicateFieldId {
                field_id: field.id.clone(),
            });
        }
        if let Some(show_if) = &field.show_if {
            lint_condition(&field.id, show_if, &known, &mut issues);
        }
        lint_item_list(field, &mut issues);
    }

    issues
}

fn lint_condition(
    owner: &str,
    show_if: &ShowIf,
    known: &HashSet<&str>,
    issues: &mut Vec<TemplateIssue>,
) {
    match show_if {
        ShowIf::Any(children) => {
            if children.is_empty() {
                issues.push(TemplateIssue::EmptyAnyCondition {
                    field_id: owner.to_string(),
                });
            }
            for child in children {
                lint_condition(owner, child, known, issues);
            }
        }
        ShowIf::Leaf(condition) => {
            match condition.field_id.as_deref() {
                None => {
                    issues.push(TemplateIssue::MissingConditionField {
                        field_id: owner.to_string(),
                    });
                    // evaluation never reaches the operator
                    return;
                }
                Some(reference) if !known.contains(reference) => {
                    issues.push(TemplateIssue::UnknownConditionField {
                        field_id: owner.to_string(),
                        references: reference.to_string(),
                    });
                }
                Some(_) => {}
            }
            if let ConditionOperator::Unrecognized(operator) = &condition.operator {
                issues.push(TemplateIssue::UnrecognizedOperator {
                    field_id: owner.to_string(),
                    operator: operator.clone(),
                });
            }
            if let Some(value) = condition.value.as_ref().filter(|v| !v.is_comparable()) {
                issues.push(TemplateIssue::UncomparableConditionValue {
                    field_id: owner.to_string(),
                    kind: value.kind().to_string(),
                });
            }
        }
    }
}

fn lint_item_list(field: &FormField, issues: &mut Vec<TemplateIssue>) {
    if !field.is_item_list() {
        return;
    }
    let Some(structure) = &field.item_structure else {
        issues.push(TemplateIssue::MissingItemStructure {
            field_id: field.id.clone(),
        });
        return;
    };
    let mut keys = HashSet::new();
    for option in &structure.key.options {
        if !keys.insert(option.value.as_str()) {
            issues.push(TemplateIssue::DuplicateKeyOption {
                field_id: field.id.clone(),
                key: option.value.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FormPage, FormSection, InputType, ItemStructure};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template_with(fields: Vec<FormField>) -> FormTemplate {
        let section = fields
            .into_iter()
            .fold(FormSection::new("s"), FormSection::with_field);
        FormTemplate::new("lint").with_page(FormPage::new("p").with_section(section))
    }

    #[test]
    fn clean_template_has_no_issues() {
        let template = template_with(vec![
            FormField::new("married", "Married", InputType::Text),
            FormField::new("spouse", "Spouse", InputType::Text)
                .show_if(ShowIf::equals("married", "yes")),
        ]);
        assert!(lint_template(&template).is_empty());
    }

    #[test]
    fn reports_condition_problems() {
        let bad_leaf: ShowIf = serde_json::from_value(json!({"operator": "equals", "value": 1})).unwrap();
        let bad_op: ShowIf =
            serde_json::from_value(json!({"fieldId": "ghost", "operator": "contains", "value": 1})).unwrap();
        let template = template_with(vec![
            FormField::new("a", "A", InputType::Text).show_if(bad_leaf),
            FormField::new("b", "B", InputType::Text).show_if(bad_op),
            FormField::new("c", "C", InputType::Text).show_if(ShowIf::any(vec![])),
        ]);

        assert_eq!(
            lint_template(&template),
            vec![
                TemplateIssue::MissingConditionField { field_id: "a".into() },
                TemplateIssue::UnknownConditionField {
                    field_id: "b".into(),
                    references: "ghost".into()
                },
                TemplateIssue::UnrecognizedOperator {
                    field_id: "b".into(),
                    operator: "contains".into()
                },
                TemplateIssue::EmptyAnyCondition { field_id: "c".into() },
            ]
        );
    }

    #[test]
    fn reports_duplicates_and_item_list_problems() {
        let template = template_with(vec![
            FormField::new("x", "X", InputType::Text),
            FormField::new("x", "X again", InputType::Text),
            FormField::new("incomes", "Incomes", InputType::ItemList),
            FormField::new("assets", "Assets", InputType::ItemList)
                .item_structure(ItemStructure::with_keys("Asset", ["land", "car", "land"])),
        ]);

        let issues = lint_template(&template);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0], TemplateIssue::DuplicateFieldId { field_id: "x".into() });
        assert_eq!(issues[1].field_id(), "incomes");
        assert!(issues[2].to_string().contains("duplicate key option 'land'"));
    }

    #[test]
    fn object_condition_value_loads_and_is_reported() {
        let template = FormTemplate::from_json_str(
            r#"{ "_id": "t", "pages": [{ "sections": [{ "fields": [
                { "id": "a", "label": "A" },
                { "id": "b", "label": "B",
                  "show_if": { "fieldId": "a", "operator": "equals", "value": { "x": 1 } } }
            ]}]}]}"#,
        )
        .unwrap();

        assert_eq!(
            lint_template(&template),
            vec![TemplateIssue::UncomparableConditionValue {
                field_id: "b".into(),
                kind: "raw".into(),
            }]
        );
    }
}
