//! The normalized result envelope.
//!
//! Every action returns an [`ExecutionResult`], regardless of kind or
//! outcome. Consumers branch on `success` and must not rely on fields
//! beyond the ones defined here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform return envelope for every action.
///
/// Invariants: `success == false` implies `data` is null and `error` is
/// present; `success == true` implies `error` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Action-specific output; null on failure.
    #[serde(default)]
    pub data: Value,
    /// Human-readable cause, present iff the action failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP status, for actions that perform an outbound call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(rename = "statusText", default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Number of retained items, for the filter action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Informational summary; never used for control flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExecutionResult {
    /// A successful result carrying the given output data.
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
            status: None,
            status_text: None,
            count: None,
            message: None,
        }
    }

    /// A failed result with a human-readable cause and null data.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
            status: None,
            status_text: None,
            count: None,
            message: None,
        }
    }

    /// Attach an informational message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach an HTTP status text.
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = Some(status_text.into());
        self
    }

    /// Attach a retained-item count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// An upstream response body, parsed as JSON on a best-effort basis.
///
/// Non-JSON bodies are carried as raw text rather than reported as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parse a raw body: valid JSON becomes `Json`, anything else `Text`.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw.to_string()),
        }
    }

    /// Collapse into a plain JSON value for the result envelope.
    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }
}
