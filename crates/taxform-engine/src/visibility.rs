//! Visibility evaluation
//!
//! Evaluates `show_if` trees against the current form data. Evaluation is
//! pure and total: malformed conditions resolve to *visible* and emit a
//! trace, they never fail.

use indexmap::IndexSet;
use taxform_schema::{Condition, ConditionOperator, FormData, FormField, FormTemplate, FormValue, ShowIf};

/// Ids of the fields currently eligible for display and validation, in
/// template order
pub type VisibleFieldIds = IndexSet<String>;

/// Whether a field with this condition is visible
#[must_use]
pub fn is_visible(show_if: Option<&ShowIf>, data: &FormData) -> bool {
    show_if.map_or(true, |show_if| evaluate(show_if, data))
}

/// Evaluate a condition tree
#[must_use]
pub fn evaluate(show_if: &ShowIf, data: &FormData) -> bool {
    match show_if {
        ShowIf::Any(children) => children.iter().any(|child| evaluate(child, data)),
        ShowIf::Leaf(condition) => evaluate_condition(condition, data),
    }
}

fn evaluate_condition(condition: &Condition, data: &FormData) -> bool {
    let Some(field_id) = condition.field_id.as_deref() else {
        tracing::debug!("show_if condition without fieldId; treating as visible");
        return true;
    };
    let actual = data.get(field_id);
    if let Some(expected) = condition.value.as_ref().filter(|v| !v.is_comparable()) {
        tracing::warn!(
            field_id,
            kind = expected.kind(),
            "show_if value is never equal to form data"
        );
    }
    match &condition.operator {
        ConditionOperator::Equals => strictly_equal(actual, condition.value.as_ref()),
        ConditionOperator::NotEquals => !strictly_equal(actual, condition.value.as_ref()),
        ConditionOperator::Unrecognized(operator) => {
            tracing::warn!(field_id, operator = %operator, "unrecognized show_if operator; treating as visible");
            true
        }
    }
}

/// Strict equality where `None` is *undefined*: undefined only equals
/// undefined, and never `null`.
#[must_use]
pub fn strictly_equal(actual: Option<&FormValue>, expected: Option<&FormValue>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(b)) => a.strict_eq(b),
        _ => false,
    }
}

/// Whether a field is visible
#[inline]
#[must_use]
pub fn is_field_visible(field: &FormField, data: &FormData) -> bool {
    is_visible(field.show_if.as_ref(), data)
}

/// Recompute the visible field set from the current data.
///
/// An absent template has no visible fields.
#[must_use]
pub fn visible_field_ids(template: Option<&FormTemplate>, data: &FormData) -> VisibleFieldIds {
    template
        .into_iter()
        .flat_map(|template| template.fields())
        .filter(|field| is_field_visible(field, data))
        .map(|field| field.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taxform_schema::{FormPage, FormSection, InputType};

    fn data(value: serde_json::Value) -> FormData {
        serde_json::from_value(value).unwrap()
    }

    fn show_if(value: serde_json::Value) -> ShowIf {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn no_condition_is_visible() {
        assert!(is_visible(None, &FormData::new()));
    }

    #[test]
    fn equals_is_strict() {
        let cond = ShowIf::equals("married", "yes");
        assert!(evaluate(&cond, &data(json!({"married": "yes"}))));
        assert!(!evaluate(&cond, &data(json!({"married": "no"}))));
        assert!(!evaluate(&cond, &data(json!({}))));

        let numeric = ShowIf::equals("children", 1_i64);
        assert!(!evaluate(&numeric, &data(json!({"children": "1"}))));
        assert!(evaluate(&numeric, &data(json!({"children": 1}))));
    }

    #[test]
    fn not_equals_is_negation() {
        let cond = ShowIf::not_equals("married", "yes");
        assert!(!evaluate(&cond, &data(json!({"married": "yes"}))));
        assert!(evaluate(&cond, &data(json!({"married": null}))));
        assert!(evaluate(&cond, &data(json!({}))));
    }

    #[test]
    fn undefined_is_not_null() {
        let null_cond = show_if(json!({"fieldId": "a", "operator": "equals", "value": null}));
        assert!(!evaluate(&null_cond, &data(json!({}))));
        assert!(evaluate(&null_cond, &data(json!({"a": null}))));

        let undefined_cond = show_if(json!({"fieldId": "a", "operator": "equals"}));
        assert!(evaluate(&undefined_cond, &data(json!({}))));
        assert!(!evaluate(&undefined_cond, &data(json!({"a": null}))));
    }

    #[test]
    fn or_is_any() {
        let cond = ShowIf::any(vec![ShowIf::equals("a", "x"), ShowIf::equals("b", "y")]);
        assert!(evaluate(&cond, &data(json!({"a": "x"}))));
        assert!(evaluate(&cond, &data(json!({"b": "y"}))));
        assert!(!evaluate(&cond, &data(json!({"a": "y", "b": "x"}))));
    }

    #[test]
    fn empty_or_is_hidden() {
        assert!(!evaluate(&ShowIf::any(vec![]), &FormData::new()));
        assert!(!evaluate(&show_if(json!({"operator": "or"})), &FormData::new()));
    }

    #[test]
    fn fails_open_on_malformed_leaves() {
        let no_field = show_if(json!({"operator": "equals", "value": "x"}));
        assert!(evaluate(&no_field, &FormData::new()));

        let unknown = show_if(json!({"fieldId": "a", "operator": "greater_than", "value": 1}));
        assert!(evaluate(&unknown, &data(json!({"a": 0}))));
    }

    #[test]
    fn object_values_never_match() {
        let equals = show_if(json!({"fieldId": "a", "operator": "equals", "value": {"x": 1}}));
        let not_equals = show_if(json!({"fieldId": "a", "operator": "not_equals", "value": {"x": 1}}));
        let same = data(json!({"a": {"x": 1}}));

        assert!(!evaluate(&equals, &same));
        assert!(evaluate(&not_equals, &same));
    }

    #[test]
    fn visible_ids_follow_template_order() {
        let template = FormTemplate::new("t").with_page(
            FormPage::new("p").with_section(
                FormSection::new("s")
                    .with_field(FormField::new("married", "Married", InputType::Text))
                    .with_field(
                        FormField::new("spouse", "Spouse", InputType::Text)
                            .show_if(ShowIf::equals("married", "yes")),
                    )
                    .with_field(FormField::new("email", "Email", InputType::Email)),
            ),
        );

        let hidden = visible_field_ids(Some(&template), &data(json!({"married": "no"})));
        assert_eq!(hidden.iter().collect::<Vec<_>>(), vec!["married", "email"]);

        let shown = visible_field_ids(Some(&template), &data(json!({"married": "yes"})));
        assert_eq!(shown.iter().collect::<Vec<_>>(), vec!["married", "spouse", "email"]);
    }

    #[test]
    fn absent_template_has_no_visible_fields() {
        assert!(visible_field_ids(None, &FormData::new()).is_empty());
    }
}
