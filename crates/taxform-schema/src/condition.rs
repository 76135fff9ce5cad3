//! `show_if` condition trees
//!
//! Templates write conditions in a loose JSON shape:
//!
//! ```text
//! { "fieldId": "has_spouse", "operator": "equals", "value": "yes" }
//! { "operator": "or", "conditions": [ ... ] }
//! ```
//!
//! The shape is normalised into [`ShowIf`] at deserialization time. Anything
//! the engine does not understand (missing `fieldId`, unknown operator) is
//! kept in the tree so evaluation can fail open and lint can report it.

use crate::value::FormValue;
use serde::{Deserialize, Deserializer, Serialize};

/// Visibility condition attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawShowIf", into = "RawShowIf")]
pub enum ShowIf {
    /// `or` composite: visible when any child is visible
    Any(Vec<ShowIf>),
    /// Single comparison against another field's value
    Leaf(Condition),
}

impl ShowIf {
    /// Leaf: `field == value`
    #[must_use]
    pub fn equals(field_id: impl Into<String>, value: impl Into<FormValue>) -> Self {
        Self::Leaf(Condition {
            field_id: Some(field_id.into()),
            operator: ConditionOperator::Equals,
            value: Some(value.into()),
        })
    }

    /// Leaf: `field != value`
    #[must_use]
    pub fn not_equals(field_id: impl Into<String>, value: impl Into<FormValue>) -> Self {
        Self::Leaf(Condition {
            field_id: Some(field_id.into()),
            operator: ConditionOperator::NotEquals,
            value: Some(value.into()),
        })
    }

    /// `or` composite
    #[must_use]
    pub fn any(conditions: Vec<ShowIf>) -> Self {
        Self::Any(conditions)
    }

    /// All leaves of the tree, depth first
    #[must_use]
    pub fn leaves(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Self::Any(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            Self::Leaf(condition) => out.push(condition),
        }
    }
}

/// Leaf comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Controlling field; `None` when the template omitted it
    pub field_id: Option<String>,
    /// Comparison operator
    pub operator: ConditionOperator,
    /// Expected value; `None` is *undefined*, distinct from `null`
    pub value: Option<FormValue>,
}

/// Leaf operators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOperator {
    /// Strict equality
    Equals,
    /// Strict inequality
    NotEquals,
    /// Anything else, kept verbatim (empty when the operator was omitted)
    Unrecognized(String),
}

impl ConditionOperator {
    /// Template spelling of the operator
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => OP_EQUALS,
            Self::NotEquals => OP_NOT_EQUALS,
            Self::Unrecognized(op) => op,
        }
    }
}

const OP_OR: &str = "or";
const OP_EQUALS: &str = "equals";
const OP_NOT_EQUALS: &str = "not_equals";

/// Wire shape of a condition node
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawShowIf {
    #[serde(rename = "fieldId", default, skip_serializing_if = "Option::is_none")]
    field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    value: Option<FormValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conditions: Option<Vec<ShowIf>>,
}

/// A present `value` key is always `Some`, even when it holds `null`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<FormValue>, D::Error>
where
    D: Deserializer<'de>,
{
    FormValue::deserialize(deserializer).map(Some)
}

impl From<RawShowIf> for ShowIf {
    fn from(raw: RawShowIf) -> Self {
        if raw.operator.as_deref() == Some(OP_OR) {
            return Self::Any(raw.conditions.unwrap_or_default());
        }
        let operator = match raw.operator.as_deref() {
            Some(OP_EQUALS) => ConditionOperator::Equals,
            Some(OP_NOT_EQUALS) => ConditionOperator::NotEquals,
            Some(other) => ConditionOperator::Unrecognized(other.to_string()),
            None => ConditionOperator::Unrecognized(String::new()),
        };
        Self::Leaf(Condition {
            field_id: raw.field_id,
            operator,
            value: raw.value,
        })
    }
}

impl From<ShowIf> for RawShowIf {
    fn from(show_if: ShowIf) -> Self {
        match show_if {
            ShowIf::Any(conditions) => Self {
                field_id: None,
                operator: Some(OP_OR.to_string()),
                value: None,
                conditions: Some(conditions),
            },
            ShowIf::Leaf(condition) => {
                let operator = match condition.operator {
                    ConditionOperator::Unrecognized(op) if op.is_empty() => None,
                    op => Some(op.as_str().to_string()),
                };
                Self {
                    field_id: condition.field_id,
                    operator,
                    value: condition.value,
                    conditions: None,
                }
            }
        }
    }
}
