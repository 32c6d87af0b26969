//! Error types for the action engine.

use apiblend_core::ActionKind;

/// Errors from action handler execution.
///
/// Expected failures (a missing URL, a non-2xx response) never surface
/// here; handlers report those through the result envelope. Everything
/// that does surface is converted to a failure envelope at the dispatcher
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("API type not supported")]
    UnsupportedKind(String),
    #[error("Action kind not registered: {0}")]
    UnregisteredHandler(ActionKind),
    #[error("Invalid action config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
