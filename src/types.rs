//! Common types used throughout the Data API SDK
//!
//! This module contains shared type aliases and the strongly-typed
//! query specification building blocks.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A document as stored in a collection: a JSON object
pub type Document = JsonObject;

// ============================================================================
// Sort
// ============================================================================

/// Sort direction for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Wire representation: 1 ascending, -1 descending
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// An ordered list of `(field path, direction)` pairs.
///
/// Kept as an explicit sequence rather than a raw map so that sort
/// priority is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    fields: Vec<(String, SortDirection)>,
}

impl Sort {
    /// Create an empty sort specification
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort ascending on a single field
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new().then(field, SortDirection::Ascending)
    }

    /// Sort descending on a single field
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new().then(field, SortDirection::Descending)
    }

    /// Append a lower-priority sort field
    #[must_use]
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.fields.push((field.into(), direction));
        self
    }

    /// True when no sort fields were given
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wire representation: `{"field": 1, "other": -1}`
    pub fn to_json(&self) -> JsonValue {
        let mut map = JsonObject::new();
        for (field, direction) in &self.fields {
            map.insert(field.clone(), JsonValue::from(direction.as_i32()));
        }
        JsonValue::Object(map)
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Which document fields to return.
///
/// A projection is either an include-list or an exclude-list, never a mix;
/// modeling it as a tagged union makes that shape a compile-time fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Return only these field paths (plus `_id` unless excluded server-side)
    Include(Vec<String>),
    /// Return everything except these field paths
    Exclude(Vec<String>),
}

impl Projection {
    /// Include a list of fields
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(fields.into_iter().map(Into::into).collect())
    }

    /// Exclude a list of fields
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Exclude(fields.into_iter().map(Into::into).collect())
    }

    /// Wire representation: `{"field": true, ...}` or `{"field": false, ...}`
    pub fn to_json(&self) -> JsonValue {
        let (fields, flag) = match self {
            Self::Include(fields) => (fields, true),
            Self::Exclude(fields) => (fields, false),
        };
        let mut map = JsonObject::new();
        for field in fields {
            map.insert(field.clone(), JsonValue::Bool(flag));
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_to_json() {
        let sort = Sort::ascending("seq");
        assert_eq!(sort.to_json(), json!({"seq": 1}));

        let sort = Sort::descending("seq").then("name", SortDirection::Ascending);
        assert_eq!(sort.to_json(), json!({"seq": -1, "name": 1}));
    }

    #[test]
    fn test_sort_empty() {
        assert!(Sort::new().is_empty());
        assert!(!Sort::ascending("f").is_empty());
    }

    #[test]
    fn test_projection_to_json() {
        let proj = Projection::include(["name", "seq"]);
        assert_eq!(proj.to_json(), json!({"name": true, "seq": true}));

        let proj = Projection::exclude(["_id"]);
        assert_eq!(proj.to_json(), json!({"_id": false}));
    }

    #[test]
    fn test_sort_direction_wire_values() {
        assert_eq!(SortDirection::Ascending.as_i32(), 1);
        assert_eq!(SortDirection::Descending.as_i32(), -1);
    }
}
