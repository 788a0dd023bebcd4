//! Lenient conversion from an untyped document tree into the rubric model.
//!
//! Every field has a default, unknown fields are ignored, and malformed
//! nested entries are treated as empty mappings. The only failure is a root
//! that is not a mapping at all; everything else is left to the validator.

use serde_yaml::Value;

use crate::bail_shape;
use crate::error::Result;
use crate::rubric::types::{
    EvaluationType, Rubric, RubricCategory, RubricCriterion, UNKNOWN_CHECK,
};

pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_RUBRIC_NAME: &str = "Unnamed Rubric";
pub const DEFAULT_ID: &str = "unknown";
pub const DEFAULT_CATEGORY_NAME: &str = "Unnamed Category";
pub const DEFAULT_CRITERION_NAME: &str = "Unnamed Criterion";
pub const DEFAULT_WEIGHT: f64 = 0.1;

/// Transform a parsed document into a [`Rubric`], filling defaults.
///
/// # Errors
///
/// Returns a shape error if `raw` is not a mapping.
pub fn transform(raw: &Value) -> Result<Rubric> {
    if !raw.is_mapping() {
        bail_shape!(describe(raw));
    }

    let rubric = Rubric {
        version: text(raw, "version", DEFAULT_VERSION),
        name: text(raw, "name", DEFAULT_RUBRIC_NAME),
        description: text(raw, "description", ""),
        categories: sequence(raw, "categories")
            .iter()
            .map(transform_category)
            .collect(),
    };

    tracing::debug!(
        name = %rubric.name,
        categories = rubric.categories.len(),
        criteria = rubric.criterion_count(),
        "transformed rubric"
    );

    Ok(rubric)
}

fn transform_category(raw: &Value) -> RubricCategory {
    RubricCategory {
        id: text(raw, "id", DEFAULT_ID),
        name: text(raw, "name", DEFAULT_CATEGORY_NAME),
        description: text(raw, "description", ""),
        weight: raw
            .get("weight")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_WEIGHT),
        criteria: sequence(raw, "criteria")
            .iter()
            .map(transform_criterion)
            .collect(),
    }
}

fn transform_criterion(raw: &Value) -> RubricCriterion {
    RubricCriterion {
        id: text(raw, "id", DEFAULT_ID),
        name: text(raw, "name", DEFAULT_CRITERION_NAME),
        description: text(raw, "description", ""),
        // Only a literal `true`; "yes"/"true" strings stay optional.
        required: matches!(raw.get("required"), Some(Value::Bool(true))),
        evaluation_type: raw
            .get("evaluationType")
            .and_then(scalar_text)
            .map(|value| EvaluationType::parse(&value))
            .unwrap_or_default(),
        check_function: text(raw, "checkFunction", UNKNOWN_CHECK),
        guidance: text(raw, "guidance", ""),
        examples: raw
            .get("examples")
            .and_then(Value::as_sequence)
            .map(|items| items.iter().filter_map(scalar_text).collect()),
    }
}

/// Read a scalar field as text; an explicit empty string is kept.
fn text(raw: &Value, key: &str, default: &str) -> String {
    raw.get(key)
        .and_then(scalar_text)
        .unwrap_or_else(|| default.to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn sequence<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key)
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        _ => "tagged value",
    }
}
