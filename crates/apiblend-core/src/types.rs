//! Core types for the action engine.
//!
//! Defines the closed set of action kinds and the request shape actions
//! arrive in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Action kinds mapping to handler implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Webhook,
    Http,
    Email,
    Slack,
    Sheets,
    Transform,
    Filter,
}

impl ActionKind {
    /// All kinds the engine knows about, in dispatch-table order.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Webhook,
        ActionKind::Http,
        ActionKind::Email,
        ActionKind::Slack,
        ActionKind::Sheets,
        ActionKind::Transform,
        ActionKind::Filter,
    ];
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Webhook => write!(f, "webhook"),
            ActionKind::Http => write!(f, "http"),
            ActionKind::Email => write!(f, "email"),
            ActionKind::Slack => write!(f, "slack"),
            ActionKind::Sheets => write!(f, "sheets"),
            ActionKind::Transform => write!(f, "transform"),
            ActionKind::Filter => write!(f, "filter"),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webhook" => Ok(ActionKind::Webhook),
            "http" => Ok(ActionKind::Http),
            "email" => Ok(ActionKind::Email),
            "slack" => Ok(ActionKind::Slack),
            "sheets" => Ok(ActionKind::Sheets),
            "transform" => Ok(ActionKind::Transform),
            "filter" => Ok(ActionKind::Filter),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

/// One unit of engine work: a kind tag, a kind-specific config, and an
/// optional input payload.
///
/// `kind` stays a plain string here so that a request naming an
/// unrecognized kind still reaches the dispatcher and comes back as a
/// normal failure envelope instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub kind: String,
    #[serde(default = "empty_config")]
    pub config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

fn empty_config() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Action {
    /// Create an action with the given kind and config and no input.
    pub fn new(kind: impl Into<String>, config: Value) -> Self {
        Self {
            kind: kind.into(),
            config,
            input: None,
        }
    }

    /// Attach an input payload.
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }
}
