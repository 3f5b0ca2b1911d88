use serde::Serialize;
use thiserror::Error;

/// One schema rule broken by a document.
///
/// `field` is a path into the document: `name`, `tools[0].permission`,
/// `parameters[2].name`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` must not be empty")]
    EmptyField { field: String },

    #[error("invalid value `{value}` for `{field}`, expected one of: {}", .allowed.join(", "))]
    InvalidEnum {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("field `{field}` must be a {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("duplicate value `{value}` in `{field}`")]
    DuplicateEntry { field: String, value: String },
}

impl Violation {
    pub fn missing(field: impl Into<String>) -> Self {
        Violation::MissingField {
            field: field.into(),
        }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        Violation::EmptyField {
            field: field.into(),
        }
    }

    /// Path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingField { field }
            | Violation::EmptyField { field }
            | Violation::InvalidEnum { field, .. }
            | Violation::TypeMismatch { field, .. }
            | Violation::DuplicateEntry { field, .. } => field,
        }
    }
}
