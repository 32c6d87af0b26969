//! Action handler registry and trait definition.
//!
//! Defines the `ActionHandler` async trait and provides the handler
//! registry for dispatching actions to the correct implementation.

pub mod email;
pub mod filter;
pub mod http;
pub mod sheets;
pub mod slack;
pub mod transform;
pub mod webhook;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use apiblend_core::{ActionKind, ExecutionResult};

use crate::error::ActionError;

/// One executable action kind.
///
/// Handlers are stateless between invocations; anything a call needs
/// arrives through `config` and `input`.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The action kind this handler implements.
    fn kind(&self) -> ActionKind;

    /// Execute the action against the given config and optional input.
    ///
    /// Expected failures (missing required config, non-2xx responses) are
    /// reported through the returned envelope; `Err` is reserved for
    /// faults the dispatcher contains at its boundary.
    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError>;

    /// One-line human-readable summary of what this action will do.
    fn describe(&self, config: &Value) -> String;
}

/// Read a string field from an optional JSON input payload.
pub(crate) fn input_str(input: Option<&Value>, key: &str) -> Option<String> {
    input
        .and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Registry mapping action kinds to handler implementations.
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under its own kind, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    /// Look up the handler for a kind.
    pub fn get(&self, kind: ActionKind) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(&kind).cloned()
    }

    /// Register the default handler set.
    ///
    /// Network handlers share one HTTP client. The client carries no
    /// timeout; the calling boundary imposes one if it needs to.
    pub fn register_defaults(&mut self) {
        let client = reqwest::Client::new();
        self.register(Arc::new(webhook::WebhookHandler::new(client.clone())));
        self.register(Arc::new(http::HttpHandler::new(client.clone())));
        self.register(Arc::new(email::EmailSimulationHandler));
        self.register(Arc::new(slack::SlackHandler::new(client)));
        self.register(Arc::new(sheets::SheetsSimulationHandler));
        self.register(Arc::new(transform::TransformHandler));
        self.register(Arc::new(filter::FilterHandler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_registry() {
        let registry = ActionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(ActionKind::Transform).is_none());
    }

    #[test]
    fn test_register_defaults_covers_every_kind() {
        let mut registry = ActionRegistry::new();
        registry.register_defaults();
        assert_eq!(registry.len(), 7);
        for kind in ActionKind::ALL {
            let handler = registry.get(kind).unwrap();
            assert_eq!(handler.kind(), kind);
        }
    }

    #[test]
    fn test_register_replaces_previous_handler() {
        let mut registry = ActionRegistry::new();
        registry.register(Arc::new(transform::TransformHandler));
        registry.register(Arc::new(transform::TransformHandler));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_input_str() {
        let input = json!({"to": "a@b.c", "n": 3});
        assert_eq!(input_str(Some(&input), "to").as_deref(), Some("a@b.c"));
        assert!(input_str(Some(&input), "n").is_none());
        assert!(input_str(Some(&input), "missing").is_none());
        assert!(input_str(None, "to").is_none());
    }
}
