//! Form-lifecycle adapter over the pure validator.
//!
//! The form layer calls [`resolve`] on every state change and before
//! submission; the returned [`Resolution`] either carries a complete
//! configuration or the field-keyed errors to annotate controls with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::CatalogSnapshot;
use crate::sft_job::SftJobConfig;

use super::fields::FieldErrors;
use super::validator::validate_sft_job;

/// Result of one resolution pass over raw form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// The validated configuration, present only when `errors` is empty.
    pub values: Option<SftJobConfig>,

    /// One entry per invalid field, keyed by form field name.
    pub errors: FieldErrors,
}

impl Resolution {
    /// Whether the pass produced a submittable configuration.
    pub fn is_valid(&self) -> bool {
        self.values.is_some()
    }
}

/// Run one full validation pass over raw form state.
///
/// Stateless: every call validates from scratch, so calling twice on the
/// same input yields identical results and nothing leaks between passes.
pub fn resolve(raw: &Map<String, Value>, catalog: &CatalogSnapshot) -> Resolution {
    match validate_sft_job(raw, catalog) {
        Ok(config) => Resolution {
            values: Some(config),
            errors: FieldErrors::new(),
        },
        Err(errors) => Resolution {
            values: None,
            errors,
        },
    }
}
