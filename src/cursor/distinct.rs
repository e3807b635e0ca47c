//! Dotted field-path handling for distinct-value extraction
//!
//! Path semantics: segments are separated by `.`. On an object, a segment
//! accesses the field with that exact name (numeric-string field names
//! included). On an array, a numeric segment indexes into the array, while
//! a non-numeric segment visits every element. Once an element is reached
//! by index, whole-list browsing is off for the remaining segments.

use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Split and validate a dotted field path.
///
/// Leading, trailing, or doubled separators produce an empty segment and
/// are rejected here, before any document is fetched.
pub fn split_field_path(path: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = path.split('.').map(ToString::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(Error::invalid_path(path, "empty path segment"));
    }
    Ok(segments)
}

/// Collect the value(s) found at `segments` inside `value`.
///
/// Returns an empty vector when the path does not resolve; a `null` leaf
/// is a real value and is returned as such.
pub fn extract_path_values(value: &JsonValue, segments: &[String]) -> Vec<JsonValue> {
    let Some((segment, rest)) = segments.split_first() else {
        return vec![value.clone()];
    };
    match value {
        JsonValue::Object(map) => map
            .get(segment)
            .map(|inner| extract_path_values(inner, rest))
            .unwrap_or_default(),
        JsonValue::Array(items) => {
            if let Ok(index) = segment.parse::<usize>() {
                items
                    .get(index)
                    .map(|inner| extract_path_values(inner, rest))
                    .unwrap_or_default()
            } else {
                // Browse the whole list, matching the segment in each element
                items
                    .iter()
                    .flat_map(|inner| extract_path_values(inner, segments))
                    .collect()
            }
        }
        _ => Vec::new(),
    }
}
