//! Response envelope types for the Data API
//!
//! Every command response carries up to three top-level members:
//! `data` (documents), `status` (operation counters and markers), and
//! `errors` (server-side failures, possibly alongside partial status).

use crate::types::{Document, JsonObject, JsonValue};
use serde::Deserialize;

/// A parsed Data API response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    /// Document payload of read commands
    pub data: Option<ResponseData>,
    /// Operation status: counters, inserted ids, `moreData` markers
    pub status: Option<JsonObject>,
    /// Server-reported errors; may coexist with a partial `status`
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl ApiResponse {
    /// True when the server reported at least one error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Read a status field, if the status object and the field are present
    pub fn status_field(&self, key: &str) -> Option<&JsonValue> {
        self.status.as_ref().and_then(|status| status.get(key))
    }

    /// Read an unsigned counter from the status object (0 when absent)
    pub fn status_count(&self, key: &str) -> u64 {
        self.status_field(key).and_then(JsonValue::as_u64).unwrap_or(0)
    }

    /// Read a boolean marker from the status object (false when absent)
    pub fn status_flag(&self, key: &str) -> bool {
        self.status_field(key).and_then(JsonValue::as_bool).unwrap_or(false)
    }
}

/// Document payload of read commands
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    /// Single document (findOne-style commands)
    pub document: Option<Document>,
    /// Document page (find-style commands)
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Continuation token; absent on the last page
    pub next_page_state: Option<String>,
}

/// A single server-side error from the `errors` array
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable error description
    pub message: String,
    /// Machine-readable error code, when the server provides one
    pub error_code: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
