//! Field and error-report types for form validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The recognized form fields, in canonical form-key spelling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Function,
    Metric,
    Model,
    Variant,
    ValidationSplitPercent,
    MaxSamples,
    Threshold,
    JobId,
}

impl FieldName {
    /// The key this field uses in raw form state.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Function => "function",
            FieldName::Metric => "metric",
            FieldName::Model => "model",
            FieldName::Variant => "variant",
            FieldName::ValidationSplitPercent => "validationSplitPercent",
            FieldName::MaxSamples => "maxSamples",
            FieldName::Threshold => "threshold",
            FieldName::JobId => "jobId",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field's value is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Required field absent or empty.
    Missing,
    /// Raw value cannot be coerced to the field's declared type.
    Type,
    /// Correct type, but outside the allowed bound.
    Range,
    /// Does not resolve against the catalog snapshot.
    Reference,
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
    /// The offending raw value, when one was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Violations keyed by field -- one entry per invalid field, so the form
/// layer can attach each message to its control.
pub type FieldErrors = BTreeMap<FieldName, FieldError>;
