//! Pure validation pass for fine-tuning job form state.
//!
//! Collects every violation in one pass -- no fail-fast -- so the form
//! layer can annotate all invalid controls at once. Catalog and cross-field
//! checks run only for fields that already passed their individual checks.

use regex::Regex;
use serde_json::{Map, Value};

use crate::catalog::{CatalogSnapshot, ModelOption};
use crate::sft_job::SftJobConfig;

use super::fields::{ErrorKind, FieldError, FieldErrors, FieldName};

/// Allowed shape for function/metric/variant identifiers.
const IDENT_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_.:-]*$";

/// Validate raw form state against a catalog snapshot.
///
/// Returns a fully-typed [`SftJobConfig`] only when every field passes; on
/// any violation returns the complete field-keyed error map instead. There
/// is no partial success. The raw input is never mutated and no state
/// survives the call.
pub fn validate_sft_job(
    raw: &Map<String, Value>,
    catalog: &CatalogSnapshot,
) -> Result<SftJobConfig, FieldErrors> {
    let mut errors = FieldErrors::new();

    let function = require_identifier(raw, FieldName::Function, &mut errors);
    let metric = require_identifier(raw, FieldName::Metric, &mut errors);
    let variant = require_identifier(raw, FieldName::Variant, &mut errors);
    let model = require_model(raw, &mut errors);
    let validation_split_percent = require_split_percent(raw, &mut errors);
    let max_samples = require_sample_count(raw, &mut errors);
    let threshold = require_threshold(raw, &mut errors);
    let job_id = optional_job_id(raw, &mut errors);

    check_function_and_metric(catalog, function.as_deref(), metric.as_deref(), &mut errors);

    if let Some(model) = &model {
        if !catalog.contains_model(model) {
            push(
                &mut errors,
                FieldName::Model,
                ErrorKind::Reference,
                format!(
                    "model '{}' from provider '{}' is not in the servable model catalog",
                    model.name, model.provider
                ),
                raw.get(FieldName::Model.as_str()),
            );
        }
    }

    match (
        function,
        metric,
        variant,
        model,
        validation_split_percent,
        max_samples,
        threshold,
        job_id,
    ) {
        (
            Some(function),
            Some(metric),
            Some(variant),
            Some(model),
            Some(validation_split_percent),
            Some(max_samples),
            Some(threshold),
            Some(job_id),
        ) if errors.is_empty() => Ok(SftJobConfig {
            function,
            metric,
            model,
            variant,
            validation_split_percent,
            max_samples,
            threshold,
            job_id,
        }),
        _ => Err(errors),
    }
}

/// Catalog resolution for `function`, plus the metric-belongs-to-function
/// cross-check. Values that failed their individual checks arrive as `None`
/// and are skipped here.
fn check_function_and_metric(
    catalog: &CatalogSnapshot,
    function: Option<&str>,
    metric: Option<&str>,
    errors: &mut FieldErrors,
) {
    let function = match function {
        Some(function) => function,
        None => return,
    };
    match catalog.function(function) {
        Some(entry) => {
            if let Some(metric) = metric {
                if !entry.metrics.contains(metric) {
                    push(
                        errors,
                        FieldName::Metric,
                        ErrorKind::Reference,
                        format!("metric '{metric}' is not associated with function '{function}'"),
                        None,
                    );
                }
            }
        }
        None => {
            push(
                errors,
                FieldName::Function,
                ErrorKind::Reference,
                format!("unknown function '{function}'"),
                None,
            );
            // The metric cannot be verified against an unknown function;
            // report it rather than letting it silently pass.
            if let Some(metric) = metric {
                push(
                    errors,
                    FieldName::Metric,
                    ErrorKind::Reference,
                    format!(
                        "metric '{metric}' cannot be verified: function '{function}' is unknown"
                    ),
                    None,
                );
            }
        }
    }
}

/// Insert a violation, keeping the first one recorded for a field.
fn push(
    errors: &mut FieldErrors,
    field: FieldName,
    kind: ErrorKind,
    message: impl Into<String>,
    value: Option<&Value>,
) {
    errors.entry(field).or_insert_with(|| FieldError {
        kind,
        message: message.into(),
        value: value.cloned(),
    });
}

/// Fetch a field, treating absent and `null` as not present.
fn present<'a>(raw: &'a Map<String, Value>, field: FieldName) -> Option<&'a Value> {
    match raw.get(field.as_str()) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

fn missing(errors: &mut FieldErrors, field: FieldName) {
    push(
        errors,
        field,
        ErrorKind::Missing,
        format!("{field} is required"),
        None,
    );
}

/// Require a non-empty identifier-shaped string field.
fn require_identifier(
    raw: &Map<String, Value>,
    field: FieldName,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = match present(raw, field) {
        Some(value) => value,
        None => {
            missing(errors, field);
            return None;
        }
    };
    let text = match value.as_str() {
        Some(text) => text,
        None => {
            push(
                errors,
                field,
                ErrorKind::Type,
                format!("{field} must be a string"),
                Some(value),
            );
            return None;
        }
    };
    if text.is_empty() {
        missing(errors, field);
        return None;
    }
    if !is_identifier(text) {
        push(
            errors,
            field,
            ErrorKind::Type,
            format!("{field} must be an identifier (letters, digits, '_', '.', ':', '-')"),
            Some(value),
        );
        return None;
    }
    Some(text.to_string())
}

/// Identifier shape check. The pattern is fixed, so compilation cannot fail.
fn is_identifier(text: &str) -> bool {
    match Regex::new(IDENT_PATTERN) {
        Ok(re) => re.is_match(text),
        Err(_) => true,
    }
}

/// Coerce a JSON number or numeric string to `f64`.
///
/// Form fields commonly deliver numbers as strings, so strings are parsed
/// before any range check; a non-numeric string is a type failure reported
/// by the caller.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn require_number(
    raw: &Map<String, Value>,
    field: FieldName,
    errors: &mut FieldErrors,
) -> Option<f64> {
    let value = match present(raw, field) {
        Some(value) => value,
        None => {
            missing(errors, field);
            return None;
        }
    };
    match coerce_number(value) {
        Some(number) => Some(number),
        None => {
            push(
                errors,
                field,
                ErrorKind::Type,
                format!("{field} must be a number"),
                Some(value),
            );
            None
        }
    }
}

/// `validationSplitPercent`: numeric and within `[0, 100]`, both ends
/// inclusive. Out-of-range input is rejected, never clamped.
fn require_split_percent(raw: &Map<String, Value>, errors: &mut FieldErrors) -> Option<f64> {
    let field = FieldName::ValidationSplitPercent;
    let number = require_number(raw, field, errors)?;
    if !(0.0..=100.0).contains(&number) {
        push(
            errors,
            field,
            ErrorKind::Range,
            format!("{field} must be between 0 and 100"),
            raw.get(field.as_str()),
        );
        return None;
    }
    Some(number)
}

/// `maxSamples`: a positive integer. Fractional or non-positive numeric
/// input is a range failure; non-numeric input is a type failure.
fn require_sample_count(raw: &Map<String, Value>, errors: &mut FieldErrors) -> Option<u64> {
    let field = FieldName::MaxSamples;
    let number = require_number(raw, field, errors)?;
    if number.fract() != 0.0 || number < 1.0 || number >= u64::MAX as f64 {
        push(
            errors,
            field,
            ErrorKind::Range,
            format!("{field} must be an integer greater than or equal to 1"),
            raw.get(field.as_str()),
        );
        return None;
    }
    Some(number as u64)
}

/// `threshold`: numeric and finite. Sign and range are owned by the
/// metric's semantics, so no further bound applies. JSON numbers are always
/// finite; non-finite values only arrive through string coercion.
fn require_threshold(raw: &Map<String, Value>, errors: &mut FieldErrors) -> Option<f64> {
    let field = FieldName::Threshold;
    let number = require_number(raw, field, errors)?;
    if !number.is_finite() {
        push(
            errors,
            field,
            ErrorKind::Range,
            format!("{field} must be finite"),
            raw.get(field.as_str()),
        );
        return None;
    }
    Some(number)
}

/// `model`: an object carrying non-empty `name` and `provider` strings.
fn require_model(raw: &Map<String, Value>, errors: &mut FieldErrors) -> Option<ModelOption> {
    let field = FieldName::Model;
    let value = match present(raw, field) {
        Some(value) => value,
        None => {
            missing(errors, field);
            return None;
        }
    };
    let object = match value.as_object() {
        Some(object) => object,
        None => {
            push(
                errors,
                field,
                ErrorKind::Type,
                format!("{field} must be an object with name and provider"),
                Some(value),
            );
            return None;
        }
    };
    let name = object.get("name").and_then(Value::as_str).unwrap_or("");
    let provider = object.get("provider").and_then(Value::as_str).unwrap_or("");
    if name.is_empty() || provider.is_empty() {
        push(
            errors,
            field,
            ErrorKind::Type,
            format!("{field} must carry non-empty name and provider strings"),
            Some(value),
        );
        return None;
    }
    Some(ModelOption {
        name: name.to_string(),
        provider: provider.to_string(),
    })
}

/// `jobId`: optional -- absent or empty before submission. Must be a string
/// when present.
fn optional_job_id(raw: &Map<String, Value>, errors: &mut FieldErrors) -> Option<String> {
    let field = FieldName::JobId;
    let value = match present(raw, field) {
        Some(value) => value,
        None => return Some(String::new()),
    };
    match value.as_str() {
        Some(text) => Some(text.to_string()),
        None => {
            push(
                errors,
                field,
                ErrorKind::Type,
                format!("{field} must be a string"),
                Some(value),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> CatalogSnapshot {
        serde_json::from_value(json!({
            "functions": {
                "extract_data": { "metrics": ["exact_match", "accuracy"] },
                "classify": { "metrics": ["f1"] }
            },
            "models": [
                { "name": "gpt-4.1", "provider": "openai" },
                { "name": "claude-3-5-haiku", "provider": "anthropic" }
            ]
        }))
        .expect("catalog JSON should deserialize")
    }

    fn form(overrides: &[(&str, Value)]) -> Map<String, Value> {
        let mut map = match json!({
            "function": "extract_data",
            "metric": "exact_match",
            "model": { "name": "gpt-4.1", "provider": "openai" },
            "variant": "baseline",
            "validationSplitPercent": 20,
            "maxSamples": 1000,
            "threshold": 0.8,
            "jobId": ""
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        for (key, value) in overrides {
            map.insert((*key).to_string(), value.clone());
        }
        map
    }

    fn without(field: &str) -> Map<String, Value> {
        let mut map = form(&[]);
        map.remove(field);
        map
    }

    // -----------------------------------------------------------------------
    // End-to-end success
    // -----------------------------------------------------------------------

    #[test]
    fn valid_form_returns_complete_config() {
        let config = validate_sft_job(&form(&[]), &catalog()).expect("form should validate");
        assert_eq!(config.function, "extract_data");
        assert_eq!(config.metric, "exact_match");
        assert_eq!(config.model.name, "gpt-4.1");
        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.variant, "baseline");
        assert_eq!(config.validation_split_percent, 20.0);
        assert_eq!(config.max_samples, 1000);
        assert_eq!(config.threshold, 0.8);
        assert_eq!(config.job_id, "");
    }

    #[test]
    fn job_id_may_be_absent_entirely() {
        let config =
            validate_sft_job(&without("jobId"), &catalog()).expect("form should validate");
        assert_eq!(config.job_id, "");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let raw = form(&[("datasetName", json!("curated-v2"))]);
        assert!(validate_sft_job(&raw, &catalog()).is_ok());
    }

    #[test]
    fn raw_input_is_not_mutated() {
        let raw = form(&[("validationSplitPercent", json!(150))]);
        let before = raw.clone();
        let _ = validate_sft_job(&raw, &catalog());
        assert_eq!(raw, before);
    }

    // -----------------------------------------------------------------------
    // validationSplitPercent range
    // -----------------------------------------------------------------------

    #[test]
    fn split_percent_boundaries_are_inclusive() {
        for boundary in [0, 100] {
            let raw = form(&[("validationSplitPercent", json!(boundary))]);
            let config = validate_sft_job(&raw, &catalog()).expect("boundary should validate");
            assert_eq!(config.validation_split_percent, f64::from(boundary));
        }
    }

    #[test]
    fn split_percent_rejects_values_just_outside() {
        for outside in [-0.0001, 100.0001] {
            let raw = form(&[("validationSplitPercent", json!(outside))]);
            let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors[&FieldName::ValidationSplitPercent].kind,
                ErrorKind::Range
            );
        }
    }

    #[test]
    fn split_percent_rejects_far_out_of_range() {
        for outside in [150, -5] {
            let raw = form(&[("validationSplitPercent", json!(outside))]);
            let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
            assert_eq!(
                errors[&FieldName::ValidationSplitPercent].kind,
                ErrorKind::Range
            );
        }
    }

    #[test]
    fn non_numeric_split_percent_is_a_type_error_not_range() {
        let raw = form(&[("validationSplitPercent", json!("twenty"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(
            errors[&FieldName::ValidationSplitPercent].kind,
            ErrorKind::Type
        );
    }

    // -----------------------------------------------------------------------
    // Numeric-string coercion
    // -----------------------------------------------------------------------

    #[test]
    fn numeric_strings_coerce_before_range_checks() {
        let raw = form(&[
            ("validationSplitPercent", json!("20")),
            ("maxSamples", json!("1000")),
            ("threshold", json!("0.8")),
        ]);
        let config = validate_sft_job(&raw, &catalog()).expect("numeric strings should coerce");
        assert_eq!(config.validation_split_percent, 20.0);
        assert_eq!(config.max_samples, 1000);
        assert_eq!(config.threshold, 0.8);
    }

    #[test]
    fn out_of_range_numeric_string_is_a_range_error() {
        let raw = form(&[("validationSplitPercent", json!("150"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(
            errors[&FieldName::ValidationSplitPercent].kind,
            ErrorKind::Range
        );
    }

    // -----------------------------------------------------------------------
    // maxSamples positivity and integrality
    // -----------------------------------------------------------------------

    #[test]
    fn max_samples_of_one_is_valid() {
        let raw = form(&[("maxSamples", json!(1))]);
        let config = validate_sft_job(&raw, &catalog()).expect("maxSamples 1 should validate");
        assert_eq!(config.max_samples, 1);
    }

    #[test]
    fn max_samples_rejects_zero_negative_and_fractional() {
        for bad in [json!(0), json!(-5), json!(3.5)] {
            let raw = form(&[("maxSamples", bad)]);
            let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[&FieldName::MaxSamples].kind, ErrorKind::Range);
        }
    }

    #[test]
    fn max_samples_rejects_non_numeric_string() {
        let raw = form(&[("maxSamples", json!("many"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::MaxSamples].kind, ErrorKind::Type);
    }

    // -----------------------------------------------------------------------
    // threshold finiteness
    // -----------------------------------------------------------------------

    #[test]
    fn threshold_may_be_negative() {
        let raw = form(&[("threshold", json!(-2.5))]);
        let config = validate_sft_job(&raw, &catalog()).expect("negative threshold is valid");
        assert_eq!(config.threshold, -2.5);
    }

    #[test]
    fn threshold_rejects_non_finite_strings() {
        for bad in ["NaN", "inf", "-inf"] {
            let raw = form(&[("threshold", json!(bad))]);
            let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
            assert_eq!(errors[&FieldName::Threshold].kind, ErrorKind::Range);
        }
    }

    #[test]
    fn non_numeric_threshold_is_the_only_error() {
        // All-or-nothing: one bad field yields no config and exactly one
        // error entry, keyed by that field.
        let raw = form(&[("threshold", json!("high"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&FieldName::Threshold].kind, ErrorKind::Type);
    }

    // -----------------------------------------------------------------------
    // Referential integrity
    // -----------------------------------------------------------------------

    #[test]
    fn metric_must_belong_to_the_given_function() {
        let raw = form(&[("function", json!("classify")), ("metric", json!("accuracy"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&FieldName::Metric].kind, ErrorKind::Reference);
        assert!(!errors.contains_key(&FieldName::Function));
    }

    #[test]
    fn unknown_function_reports_function_and_metric() {
        let raw = form(&[("function", json!("summarize"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::Function].kind, ErrorKind::Reference);
        assert_eq!(errors[&FieldName::Metric].kind, ErrorKind::Reference);
    }

    #[test]
    fn cross_check_waits_for_individual_checks() {
        // An empty metric reports as missing, not as a reference failure.
        let raw = form(&[("metric", json!(""))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&FieldName::Metric].kind, ErrorKind::Missing);
    }

    #[test]
    fn unknown_model_is_a_reference_error() {
        let raw = form(&[(
            "model",
            json!({ "name": "gpt-4.1", "provider": "anthropic" }),
        )]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&FieldName::Model].kind, ErrorKind::Reference);
    }

    // -----------------------------------------------------------------------
    // Type and shape checks
    // -----------------------------------------------------------------------

    #[test]
    fn model_must_be_an_object() {
        let raw = form(&[("model", json!("gpt-4.1"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::Model].kind, ErrorKind::Type);
    }

    #[test]
    fn model_requires_both_name_and_provider() {
        let raw = form(&[("model", json!({ "name": "gpt-4.1" }))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::Model].kind, ErrorKind::Type);
    }

    #[test]
    fn identifier_fields_reject_whitespace() {
        let raw = form(&[("function", json!("extract data"))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::Function].kind, ErrorKind::Type);
    }

    #[test]
    fn job_id_must_be_a_string_when_present() {
        let raw = form(&[("jobId", json!(42))]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::JobId].kind, ErrorKind::Type);
    }

    #[test]
    fn submitted_job_id_passes_through() {
        let raw = form(&[("jobId", json!("ft-20260806-0042"))]);
        let config = validate_sft_job(&raw, &catalog()).expect("form should validate");
        assert_eq!(config.job_id, "ft-20260806-0042");
        assert!(config.is_submitted());
    }

    // -----------------------------------------------------------------------
    // Missing fields
    // -----------------------------------------------------------------------

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate_sft_job(&Map::new(), &catalog()).unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(!errors.contains_key(&FieldName::JobId));
        assert!(errors.values().all(|e| e.kind == ErrorKind::Missing));
    }

    #[test]
    fn null_field_reports_missing() {
        let raw = form(&[("function", Value::Null)]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors[&FieldName::Function].kind, ErrorKind::Missing);
    }

    #[test]
    fn multiple_violations_are_all_collected() {
        let raw = form(&[
            ("validationSplitPercent", json!(150)),
            ("maxSamples", json!(0)),
            ("threshold", json!("high")),
        ]);
        let errors = validate_sft_job(&raw, &catalog()).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
