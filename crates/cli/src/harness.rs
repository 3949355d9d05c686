//! One-shot resolution harness.
//!
//! Loads a catalog snapshot and raw form state from disk, runs a single
//! validation pass, and hands the [`Resolution`] back to the caller.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use tunelaunch_core::catalog::CatalogSnapshot;
use tunelaunch_core::validation::resolver::{self, Resolution};

/// Load and integrity-check a catalog snapshot from a JSON file.
pub fn load_catalog(path: &Path) -> Result<CatalogSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading catalog snapshot {}", path.display()))?;
    let catalog: CatalogSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing catalog snapshot {}", path.display()))?;
    catalog
        .ensure_well_formed()
        .with_context(|| format!("checking catalog snapshot {}", path.display()))?;
    Ok(catalog)
}

/// Load raw form state from a JSON file. The top level must be an object.
pub fn load_form_state(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading form state {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing form state {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("form state {} must be a JSON object", path.display()),
    }
}

/// Run one resolution pass over the files at the given paths.
pub fn run(catalog_path: &Path, form_state_path: &Path) -> Result<Resolution> {
    let catalog = load_catalog(catalog_path)?;
    let raw = load_form_state(form_state_path)?;

    let resolution = resolver::resolve(&raw, &catalog);
    match &resolution.values {
        Some(config) => tracing::info!(
            function = %config.function,
            model = %config.model.name,
            provider = %config.model.provider,
            "form state resolved to a valid job configuration",
        ),
        None => tracing::warn!(
            invalid_fields = resolution.errors.len(),
            "form state failed validation",
        ),
    }
    Ok(resolution)
}
