//! Read-only catalog snapshot types.
//!
//! The inference gateway owns the inventory of deployed functions, their
//! metrics, and servable models. Validation receives a snapshot as an
//! explicit parameter and only performs membership queries; it never
//! fetches or refreshes one.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A servable model: model name plus the provider that serves it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelOption {
    pub name: String,
    pub provider: String,
}

/// Catalog entry for one deployed function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// Metrics associated with this function.
    #[serde(default)]
    pub metrics: BTreeSet<String>,
}

/// Read-only view of the deployed configuration at one point in time.
///
/// Deserializable from gateway-exported JSON. Treated as immutable for the
/// lifetime of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Deployed functions, keyed by function name.
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionEntry>,

    /// Models the serving backend can fine-tune.
    #[serde(default)]
    pub models: BTreeSet<ModelOption>,
}

impl CatalogSnapshot {
    /// Look up a deployed function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    /// Whether the given model option is servable.
    pub fn contains_model(&self, model: &ModelOption) -> bool {
        self.models.contains(model)
    }

    /// Reject corrupt snapshots (empty function, metric, or model names).
    ///
    /// A malformed catalog is a caller bug, not form input, so this surfaces
    /// as a [`CoreError`] rather than a field error.
    pub fn ensure_well_formed(&self) -> Result<(), CoreError> {
        for (name, entry) in &self.functions {
            if name.is_empty() {
                return Err(CoreError::Catalog(
                    "function with empty name".to_string(),
                ));
            }
            if entry.metrics.iter().any(|metric| metric.is_empty()) {
                return Err(CoreError::Catalog(format!(
                    "function '{name}' lists an empty metric name"
                )));
            }
        }
        for model in &self.models {
            if model.name.is_empty() || model.provider.is_empty() {
                return Err(CoreError::Catalog(
                    "model option with empty name or provider".to_string(),
                ));
            }
        }
        Ok(())
    }
}
