//! JSON-LD generation and validation
//!
//! Documents are plain ordered maps; which properties a type needs comes
//! from the [`catalog`] table rather than from one Rust type per schema.

pub mod catalog;
mod generator;
mod validator;

pub use catalog::{lookup, supported_types, SchemaType};
pub use generator::{fields_from_document, generate, to_script_tag, SCHEMA_CONTEXT};
pub use validator::{validate, ValidationReport};

use thiserror::Error;

/// A JSON-LD object; key order is preserved
pub type SchemaDocument = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Unsupported schema type: {0}")]
    UnknownType(String),

    #[error("Missing required fields for {schema_type}: {}", .fields.join(", "))]
    MissingRequired {
        schema_type: String,
        fields: Vec<String>,
    },
}

/// True for values that count as absent: JSON null or a blank string
pub(crate) fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
