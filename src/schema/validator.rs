//! Checks JSON-LD documents against the catalog

use crate::schema::catalog::lookup;
use crate::schema::is_blank;
use serde::Serialize;
use serde_json::{Map, Value};

/// Result of validating one document
///
/// `suggestions` list absent optional properties and never affect
/// `is_valid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Validates any JSON value as a JSON-LD document
///
/// A top-level `@graph` array is accepted: the shared `@context` is checked
/// once and every node is validated as its own document.
///
/// # Example
///
/// ```
/// use seo_audit::schema::validate;
/// use serde_json::json;
///
/// let report = validate(&json!({"@context": "https://schema.org", "@type": "Organization", "name": "Acme"}));
/// assert!(!report.is_valid);
/// assert_eq!(report.errors, vec!["Missing required field: url"]);
/// ```
pub fn validate(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    match value.as_object() {
        None => report
            .errors
            .push("Schema must be a JSON object".to_string()),
        Some(object) => {
            if object.get("@context").map_or(true, is_blank) {
                report.errors.push("Missing @context".to_string());
            }

            match object.get("@graph").and_then(Value::as_array) {
                Some(nodes) if !object.contains_key("@type") => {
                    for node in nodes {
                        match node.as_object() {
                            Some(node) => check_node(node, &mut report),
                            None => report
                                .errors
                                .push("@graph entries must be JSON objects".to_string()),
                        }
                    }
                }
                _ => check_node(object, &mut report),
            }
        }
    }

    report.is_valid = report.errors.is_empty();
    report
}

fn check_node(node: &Map<String, Value>, report: &mut ValidationReport) {
    let schema_type = match node.get("@type") {
        None => {
            report.errors.push("Missing @type".to_string());
            return;
        }
        Some(value) if is_blank(value) => {
            report.errors.push("Missing @type".to_string());
            return;
        }
        Some(Value::String(schema_type)) => schema_type.as_str(),
        Some(_) => {
            report.errors.push("@type must be a string".to_string());
            return;
        }
    };

    let Some(contract) = lookup(schema_type) else {
        report
            .errors
            .push(format!("Unsupported schema type: {}", schema_type));
        return;
    };

    for field in contract.required {
        if node.get(*field).map_or(true, is_blank) {
            report
                .errors
                .push(format!("Missing required field: {}", field));
        }
    }

    for field in contract.optional {
        if node.get(*field).map_or(true, is_blank) {
            report
                .suggestions
                .push(format!("Consider adding optional field: {}", field));
        }
    }
}
