//! Testing utilities for the taxform workspace
//!
//! Shared template and data fixtures.

#![allow(missing_docs)]

use serde_json::{json, Value};
use taxform_schema::prelude::*;

pub fn single_section(id: &str, fields: Vec<FormField>) -> FormTemplate {
    let section = fields
        .into_iter()
        .fold(FormSection::new("Main"), FormSection::with_field);
    FormTemplate::new(id).with_page(FormPage::new("Main").with_section(section))
}

/// `field1: text`, `field2: email`
pub fn two_field_template() -> FormTemplate {
    single_section(
        "two-field",
        vec![
            FormField::new("field1", "Field 1", InputType::Text),
            FormField::new("field2", "Field 2", InputType::Email),
        ],
    )
}

/// `married` plus a `spouse_name` shown only when married is `"yes"`
pub fn spouse_template() -> FormTemplate {
    single_section(
        "spouse",
        vec![
            FormField::new("married", "Married", InputType::Text),
            FormField::new("spouse_name", "Spouse name", InputType::Text)
                .show_if(ShowIf::equals("married", "yes")),
        ],
    )
}

pub fn keyed_list_field<'a>(id: &str, options: impl IntoIterator<Item = &'a str>) -> FormField {
    FormField::new(id, "Items", InputType::ItemList).item_structure(
        ItemStructure::with_keys("Key", options)
            .with_field(FormField::new("amount", "Amount", InputType::Number)),
    )
}

pub fn keyed_list_template<'a>(options: impl IntoIterator<Item = &'a str>) -> FormTemplate {
    single_section("keyed-list", vec![keyed_list_field("items", options)])
}

/// A small individual income tax return covering every input type
pub fn sample_return_json() -> Value {
    json!({
        "_id": "individual-2024",
        "name": "Individual Income Tax Return",
        "yearOfAssessment": "2024/2025",
        "pages": [
            {
                "id": "personal",
                "title": "Personal details",
                "sections": [
                    {
                        "id": "identity",
                        "title": "Identity",
                        "fields": [
                            { "id": "tin", "label": "TIN", "inputType": "text" },
                            { "id": "email", "label": "Email", "inputType": "email" },
                            {
                                "id": "residency_note",
                                "label": "Residents are taxed on worldwide income",
                                "inputType": "readonly_note"
                            },
                            { "id": "married", "label": "Married", "inputType": "text" },
                            {
                                "id": "spouse_tin",
                                "label": "Spouse TIN",
                                "inputType": "text",
                                "show_if": { "fieldId": "married", "operator": "equals", "value": "yes" }
                            }
                        ]
                    }
                ]
            },
            {
                "id": "income",
                "title": "Income",
                "sections": [
                    {
                        "id": "sources",
                        "title": "Sources",
                        "fields": [
                            { "id": "employment_type", "label": "Employment type", "inputType": "text" },
                            {
                                "id": "employer_tin",
                                "label": "Employer TIN",
                                "inputType": "text",
                                "show_if": {
                                    "operator": "or",
                                    "conditions": [
                                        { "fieldId": "employment_type", "operator": "equals", "value": "primary" },
                                        { "fieldId": "employment_type", "operator": "equals", "value": "secondary" }
                                    ]
                                }
                            },
                            {
                                "id": "other_income",
                                "label": "Other income",
                                "inputType": "itemList",
                                "show_if": { "fieldId": "employment_type", "operator": "not_equals", "value": "none" },
                                "itemStructure": {
                                    "key": {
                                        "label": "Source",
                                        "options": [
                                            "rent",
                                            { "value": "interest", "label": "Interest" },
                                            { "value": "dividends", "label": "Dividends" }
                                        ]
                                    },
                                    "fields": [
                                        { "id": "amount", "label": "Amount", "inputType": "number" }
                                    ]
                                }
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

pub fn sample_return() -> FormTemplate {
    serde_json::from_value(sample_return_json()).expect("sample template parses")
}

/// Data that passes validation against [`sample_return`]
pub fn sample_complete_data() -> FormData {
    serde_json::from_value(json!({
        "tin": "123456789",
        "email": "taxpayer@example.lk",
        "married": "no",
        "employment_type": "primary",
        "employer_tin": "987654321",
        "other_income": [
            { "key": "rent", "values": { "amount": 120000 } }
        ]
    }))
    .expect("sample data parses")
}
