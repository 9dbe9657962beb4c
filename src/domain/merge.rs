//! Deep merge of configuration mappings
//!
//! `override` wins on every conflicting leaf. Only mappings recurse; arrays,
//! scalars and client expressions are replaced whole. Inputs are never
//! mutated.

use serde_json::Value;

use super::error::MergeError;
use super::value::{json_kind, ConfigObject, ConfigValue};

/// Merge `overrides` onto `base`, returning a new mapping.
///
/// Keys keep the order of `base`; keys only present in `overrides` are
/// appended in their own order.
pub fn deep_merge(base: &ConfigObject, overrides: &ConfigObject) -> ConfigObject {
    let mut result = base.clone();
    for (key, value) in overrides.iter() {
        let merged = match (result.get(key).and_then(ConfigValue::to_mapping), value.to_mapping()) {
            (Some(left), Some(right)) => ConfigValue::Object(deep_merge(&left, &right)),
            _ => value.clone(),
        };
        result.insert(key, merged);
    }
    result
}

/// [`deep_merge`] for arbitrary values; both sides must be mappings.
pub fn merge_values(base: &ConfigValue, overrides: &ConfigValue) -> Result<ConfigObject, MergeError> {
    let left = base.to_mapping().ok_or(MergeError::NotAMapping {
        side: "base",
        kind: base.kind(),
    })?;
    let right = overrides.to_mapping().ok_or(MergeError::NotAMapping {
        side: "override",
        kind: overrides.kind(),
    })?;
    Ok(deep_merge(&left, &right))
}

/// [`deep_merge`] over plain JSON documents.
pub fn merge_json(base: &Value, overrides: &Value) -> Result<Value, MergeError> {
    let left = base.as_object().ok_or(MergeError::NotAMapping {
        side: "base",
        kind: json_kind(base),
    })?;
    let right = overrides.as_object().ok_or(MergeError::NotAMapping {
        side: "override",
        kind: json_kind(overrides),
    })?;

    let mut result = left.clone();
    for (key, value) in right {
        let merged = match (result.get(key), value) {
            (Some(l @ Value::Object(_)), Value::Object(_)) => merge_json(l, value)?,
            _ => value.clone(),
        };
        result.insert(key.clone(), merged);
    }
    Ok(Value::Object(result))
}
