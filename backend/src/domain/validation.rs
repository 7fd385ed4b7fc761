//! Field-level validation failures shared by the draft validators.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Error;

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// Required value missing or blank.
    Required,
    /// Value outside the permitted range.
    OutOfRange,
    /// Value present but malformed.
    Invalid,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    field: String,
    code: FieldErrorCode,
    message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    /// Shorthand for a missing required field.
    pub fn required(field: &str, message: impl Into<String>) -> Self {
        Self::new(field, FieldErrorCode::Required, message)
    }

    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    pub fn code(&self) -> FieldErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Wrap field errors into an `invalid_request` error with
/// `details.fieldErrors`.
pub fn validation_failure(errors: &[FieldError]) -> Error {
    Error::invalid_request("validation failed").with_details(json!({ "fieldErrors": errors }))
}
