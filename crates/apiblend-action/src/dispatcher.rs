//! Action dispatcher.
//!
//! Maps an action-kind tag to its handler, invokes it, and converts any
//! escaped fault into a failure envelope. This is the single containment
//! boundary of the engine: no error type crosses it, and callers branch
//! on `success` instead of catching anything.

use serde_json::Value;

use apiblend_core::{Action, ActionKind, ExecutionResult};

use crate::error::ActionError;
use crate::handler::ActionRegistry;

/// Dispatches actions to registered handlers, one at a time.
pub struct Dispatcher {
    registry: ActionRegistry,
}

impl Dispatcher {
    /// Create a dispatcher over the given registry.
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    /// Create a dispatcher with the default handler set.
    pub fn with_defaults() -> Self {
        let mut registry = ActionRegistry::new();
        registry.register_defaults();
        Self::new(registry)
    }

    /// Execute one action and return its normalized envelope.
    ///
    /// Never panics and never returns an error: unsupported kinds and
    /// handler faults come back as `success:false` envelopes.
    pub async fn execute(
        &self,
        kind: &str,
        config: &Value,
        input: Option<&Value>,
    ) -> ExecutionResult {
        match self.try_execute(kind, config, input).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(kind = %kind, error = %err, "Action failed");
                ExecutionResult::failure(err.to_string())
            }
        }
    }

    async fn try_execute(
        &self,
        kind: &str,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let kind: ActionKind = kind
            .parse()
            .map_err(|_| ActionError::UnsupportedKind(kind.to_string()))?;
        let handler = self
            .registry
            .get(kind)
            .ok_or(ActionError::UnregisteredHandler(kind))?;

        tracing::debug!(kind = %kind, action = %handler.describe(config), "Dispatching action");

        handler.execute(config, input).await
    }

    /// Execute a single request-shaped action.
    pub async fn execute_action(&self, action: &Action) -> ExecutionResult {
        self.execute(&action.kind, &action.config, action.input.as_ref())
            .await
    }

    /// Execute an ordered list of actions, feeding each result's `data`
    /// as the next action's input (the first action uses its own input).
    ///
    /// Actions run strictly sequentially; the chain stops after the first
    /// failed action and returns the results produced so far.
    pub async fn execute_chain(&self, actions: &[Action]) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(actions.len());
        let mut carried: Option<Value> = None;

        for action in actions {
            let input = carried.as_ref().or(action.input.as_ref());
            let result = self.execute(&action.kind, &action.config, input).await;
            let failed = !result.success;
            carried = Some(result.data.clone());
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_dispatcher() -> Dispatcher {
        Dispatcher::with_defaults()
    }

    // ---- execute ----

    #[tokio::test]
    async fn test_execute_unsupported_kind() {
        let dispatcher = make_dispatcher();
        for config in [json!({}), json!({"url": "https://example.com"}), json!(null)] {
            let result = dispatcher.execute("telegram", &config, None).await;
            assert!(!result.success);
            assert_eq!(result.error.as_deref(), Some("API type not supported"));
            assert!(result.data.is_null());
        }
    }

    #[tokio::test]
    async fn test_execute_transform() {
        let dispatcher = make_dispatcher();
        let config = json!({"transformations": [{"type": "pick", "fields": ["a"]}]});
        let input = json!({"a": 1, "b": 2});
        let result = dispatcher.execute("transform", &config, Some(&input)).await;
        assert!(result.success);
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_execute_contains_malformed_config() {
        let dispatcher = make_dispatcher();
        // transformations must be an array; the fault is contained, not thrown.
        let config = json!({"transformations": 5});
        let result = dispatcher.execute("transform", &config, None).await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Invalid action config: "));
        assert!(result.data.is_null());
    }

    #[tokio::test]
    async fn test_execute_unregistered_handler() {
        let dispatcher = Dispatcher::new(ActionRegistry::new());
        let result = dispatcher.execute("transform", &json!({}), None).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Action kind not registered: transform")
        );
    }

    #[tokio::test]
    async fn test_execute_reported_failure_passes_through() {
        let dispatcher = make_dispatcher();
        let result = dispatcher.execute("webhook", &json!({}), None).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("URL is required for webhook"));
    }

    #[tokio::test]
    async fn test_execute_contains_transport_error() {
        let dispatcher = make_dispatcher();
        let config = json!({"url": "http://127.0.0.1:1/hook"});
        let result = dispatcher.execute("webhook", &config, None).await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("HTTP request failed: "));
    }

    // ---- execute_action ----

    #[tokio::test]
    async fn test_execute_action() {
        let dispatcher = make_dispatcher();
        let action = Action::new("filter", json!({"conditions": []}))
            .with_input(json!([{"a": 1}]));
        let result = dispatcher.execute_action(&action).await;
        assert!(result.success);
        assert_eq!(result.count, Some(1));
    }

    // ---- execute_chain ----

    #[tokio::test]
    async fn test_chain_threads_data_into_next_input() {
        let dispatcher = make_dispatcher();
        let actions = [
            Action::new(
                "transform",
                json!({"transformations": [
                    {"type": "map", "mapping": {"name": "firstName", "score": "points"}}
                ]}),
            )
            .with_input(json!([
                {"firstName": "Ada", "points": 9},
                {"firstName": "Alan", "points": 3}
            ])),
            Action::new(
                "filter",
                json!({"conditions": [{"field": "score", "operator": "greaterThan", "value": 5}]}),
            ),
        ];

        let results = dispatcher.execute_chain(&actions).await;
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert!(results[1].success);
        assert_eq!(results[1].data, json!([{"name": "Ada", "score": 9}]));
        assert_eq!(results[1].count, Some(1));
    }

    #[tokio::test]
    async fn test_chain_previous_output_wins_over_own_input() {
        let dispatcher = make_dispatcher();
        let actions = [
            Action::new("transform", json!({"transformations": []}))
                .with_input(json!({"from": "first"})),
            // The second action's own input must be ignored.
            Action::new("transform", json!({"transformations": []}))
                .with_input(json!({"from": "second"})),
        ];

        let results = dispatcher.execute_chain(&actions).await;
        assert_eq!(results[1].data, json!({"from": "first"}));
    }

    #[tokio::test]
    async fn test_chain_stops_after_failure() {
        let dispatcher = make_dispatcher();
        let actions = [
            Action::new("webhook", json!({})),
            Action::new("transform", json!({"transformations": []})),
        ];

        let results = dispatcher.execute_chain(&actions).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
    }

    #[tokio::test]
    async fn test_chain_empty_list() {
        let dispatcher = make_dispatcher();
        let results = dispatcher.execute_chain(&[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_chain_transform_then_filter_round_trip() {
        let dispatcher = make_dispatcher();
        let actions = [
            Action::new(
                "transform",
                json!({"transformations": [{"type": "merge", "mergeWith": {"checked": true}}]}),
            )
            .with_input(json!({"id": 7})),
            Action::new(
                "filter",
                json!({"conditions": [{"field": "checked", "operator": "equals", "value": true}]}),
            ),
        ];

        let results = dispatcher.execute_chain(&actions).await;
        assert_eq!(results[1].data, json!([{"id": 7, "checked": true}]));
    }
}
