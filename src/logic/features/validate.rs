//! Request payload validation
//!
//! Turns a raw `/predict` body into a FeatureVector. Checks run in a fixed
//! order and the first violated constraint is reported.

use serde_json::Value;

use super::layout::FEATURE_LAYOUT;
use super::vector::{check_length, FeatureVector};
use crate::logic::error::{ScoringError, ScoringResult};

/// Field holding the ordered feature values
pub const FEATURES_FIELD: &str = "features";

/// Parse and validate a raw JSON body
pub fn parse_payload(body: &[u8]) -> ScoringResult<FeatureVector> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ScoringError::invalid_input(format!("invalid JSON body: {}", e)))?;

    features_from_value(&value)
}

/// Validate an already-parsed JSON document
pub fn features_from_value(value: &Value) -> ScoringResult<FeatureVector> {
    let object = value
        .as_object()
        .ok_or_else(|| ScoringError::invalid_input("request body must be a JSON object"))?;

    let features = object
        .get(FEATURES_FIELD)
        .ok_or_else(|| ScoringError::invalid_input(format!("missing '{}' field", FEATURES_FIELD)))?;

    let items = features
        .as_array()
        .ok_or_else(|| ScoringError::invalid_input(format!("'{}' must be an array", FEATURES_FIELD)))?;

    // Length is reported before any element type
    check_length(items.len())?;

    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            coerce(item).ok_or_else(|| {
                ScoringError::invalid_input(format!(
                    "feature {} ('{}') is not numeric: {}",
                    i, FEATURE_LAYOUT[i], item
                ))
            })
        })
        .collect::<ScoringResult<Vec<f64>>>()?;

    FeatureVector::from_slice(&values)
}

/// Numbers and booleans coerce to f64. Strings are not numeric.
fn coerce(item: &Value) -> Option<f64> {
    match item {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
