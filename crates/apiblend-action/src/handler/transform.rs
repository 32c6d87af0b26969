//! Transform action handler.
//!
//! Applies an ordered pipeline of data operations to a single working
//! value. The pipeline never fails the action: unknown or malformed steps
//! apply as no-ops, so a broken pipeline degrades instead of erroring.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use apiblend_core::{ActionKind, ExecutionResult};

use crate::error::ActionError;
use crate::handler::ActionHandler;

/// Configuration for the transform action.
///
/// Steps are kept as raw values so a single malformed step degrades to
/// [`TransformStep::Unknown`] instead of failing the whole call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub transformations: Vec<Value>,
}

/// A single pipeline step. Steps consume and replace the working value in
/// array order; order matters.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformStep {
    /// Remap each element of an array into a new object
    /// (`output key -> input key`). Non-arrays pass through unchanged.
    Map {
        #[serde(default)]
        mapping: HashMap<String, String>,
    },
    /// Keep only the listed fields of an object, in the listed order.
    /// Without a field list this is a no-op.
    Pick {
        #[serde(default)]
        fields: Option<Vec<String>>,
    },
    /// Shallow-merge a fixed mapping over the working value; later keys
    /// win.
    Merge {
        #[serde(default, rename = "mergeWith")]
        merge_with: Map<String, Value>,
    },
    /// Upper-case a string value, or every string-valued property of an
    /// object. Arrays and other primitives pass through unchanged.
    Uppercase,
    /// Unrecognized step type; applies as a no-op.
    #[serde(other)]
    Unknown,
}

impl TransformStep {
    /// Apply this step to the working value, producing the next one.
    fn apply(&self, value: Value) -> Value {
        match self {
            TransformStep::Map { mapping } => map_elements(value, mapping),
            TransformStep::Pick { fields: Some(fields) } => pick_fields(value, fields),
            TransformStep::Pick { fields: None } => value,
            TransformStep::Merge { merge_with } => merge_over(value, merge_with),
            TransformStep::Uppercase => uppercase(value),
            TransformStep::Unknown => value,
        }
    }
}

fn map_elements(value: Value, mapping: &HashMap<String, String>) -> Value {
    let Value::Array(items) = value else {
        return value;
    };
    let mapped = items
        .into_iter()
        .map(|item| {
            let mut entry = Map::new();
            for (new_key, old_key) in mapping {
                if let Some(v) = item.get(old_key) {
                    entry.insert(new_key.clone(), v.clone());
                }
            }
            Value::Object(entry)
        })
        .collect();
    Value::Array(mapped)
}

fn pick_fields(value: Value, fields: &[String]) -> Value {
    let mut picked = Map::new();
    if let Value::Object(source) = value {
        for field in fields {
            if let Some(v) = source.get(field) {
                picked.insert(field.clone(), v.clone());
            }
        }
    }
    Value::Object(picked)
}

fn merge_over(value: Value, merge_with: &Map<String, Value>) -> Value {
    let mut target = match value {
        Value::Object(obj) => obj,
        _ => Map::new(),
    };
    for (key, v) in merge_with {
        target.insert(key.clone(), v.clone());
    }
    Value::Object(target)
}

fn uppercase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_uppercase()),
        Value::Object(mut obj) => {
            for v in obj.values_mut() {
                if let Value::String(s) = v {
                    *s = s.to_uppercase();
                }
            }
            Value::Object(obj)
        }
        other => other,
    }
}

/// Handler for transform actions. Always reports success.
pub struct TransformHandler;

#[async_trait]
impl ActionHandler for TransformHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Transform
    }

    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: TransformConfig = serde_json::from_value(config.clone())?;

        let mut value = input.cloned().unwrap_or_else(|| json!({}));
        for raw in &config.transformations {
            let step = serde_json::from_value::<TransformStep>(raw.clone())
                .unwrap_or(TransformStep::Unknown);
            value = step.apply(value);
        }

        tracing::debug!(steps = config.transformations.len(), "Transform pipeline applied");

        Ok(ExecutionResult::success(value).with_message("Data transformed successfully"))
    }

    fn describe(&self, config: &Value) -> String {
        let steps = config
            .get("transformations")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0);
        format!("Apply {} transform step(s)", steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(config: Value, input: Value) -> ExecutionResult {
        TransformHandler.execute(&config, Some(&input)).await.unwrap()
    }

    #[tokio::test]
    async fn test_pick_retains_listed_fields() {
        let config = json!({"transformations": [{"type": "pick", "fields": ["a", "b"]}]});
        let result = run(config, json!({"a": 1, "b": 2, "c": 3})).await;
        assert!(result.success);
        assert_eq!(result.data, json!({"a": 1, "b": 2}));
    }

    #[tokio::test]
    async fn test_pick_omits_missing_fields() {
        let config = json!({"transformations": [{"type": "pick", "fields": ["a", "z"]}]});
        let result = run(config, json!({"a": 1, "b": 2})).await;
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_pick_without_fields_is_noop() {
        let config = json!({"transformations": [{"type": "pick"}]});
        let result = run(config, json!({"a": 1})).await;
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_map_remaps_array_elements() {
        let config = json!({"transformations": [
            {"type": "map", "mapping": {"name": "firstName", "mail": "email"}}
        ]});
        let input = json!([
            {"firstName": "Ada", "email": "ada@example.com", "age": 36},
            {"firstName": "Alan", "email": "alan@example.com"}
        ]);
        let result = run(config, input).await;
        assert_eq!(
            result.data,
            json!([
                {"name": "Ada", "mail": "ada@example.com"},
                {"name": "Alan", "mail": "alan@example.com"}
            ])
        );
    }

    #[tokio::test]
    async fn test_map_drops_entries_for_missing_source_keys() {
        let config = json!({"transformations": [{"type": "map", "mapping": {"name": "missing"}}]});
        let result = run(config, json!([{"a": 1}])).await;
        assert_eq!(result.data, json!([{}]));
    }

    #[tokio::test]
    async fn test_map_on_non_array_is_noop() {
        let config = json!({"transformations": [{"type": "map", "mapping": {"a": "b"}}]});
        let result = run(config, json!({"b": 1})).await;
        assert_eq!(result.data, json!({"b": 1}));
    }

    #[tokio::test]
    async fn test_merge_overwrites_on_collision() {
        let config = json!({"transformations": [
            {"type": "merge", "mergeWith": {"b": 9, "c": 3}}
        ]});
        let result = run(config, json!({"a": 1, "b": 2})).await;
        assert_eq!(result.data, json!({"a": 1, "b": 9, "c": 3}));
    }

    #[tokio::test]
    async fn test_merge_on_non_object_replaces_with_merge_map() {
        let config = json!({"transformations": [{"type": "merge", "mergeWith": {"a": 1}}]});
        let result = run(config, json!("scalar")).await;
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_uppercase_string() {
        let config = json!({"transformations": [{"type": "uppercase"}]});
        let result = run(config, json!("hello")).await;
        assert_eq!(result.data, json!("HELLO"));
    }

    #[tokio::test]
    async fn test_uppercase_object_leaves_non_strings() {
        let config = json!({"transformations": [{"type": "uppercase"}]});
        let result = run(config, json!({"x": "hi", "y": 2, "z": true})).await;
        assert_eq!(result.data, json!({"x": "HI", "y": 2, "z": true}));
    }

    #[tokio::test]
    async fn test_uppercase_array_is_noop() {
        let config = json!({"transformations": [{"type": "uppercase"}]});
        let result = run(config, json!(["hi", "ho"])).await;
        assert_eq!(result.data, json!(["hi", "ho"]));
    }

    #[tokio::test]
    async fn test_unknown_step_is_noop_and_still_succeeds() {
        let config = json!({"transformations": [{"type": "reverse"}]});
        let result = run(config, json!({"a": 1})).await;
        assert!(result.success);
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_malformed_step_degrades_to_noop() {
        let config = json!({"transformations": [{"type": "map", "mapping": 5}]});
        let result = run(config, json!([{"a": 1}])).await;
        assert!(result.success);
        assert_eq!(result.data, json!([{"a": 1}]));
    }

    #[tokio::test]
    async fn test_steps_apply_in_order() {
        let config = json!({"transformations": [
            {"type": "merge", "mergeWith": {"b": "two"}},
            {"type": "pick", "fields": ["b"]},
            {"type": "uppercase"}
        ]});
        let result = run(config, json!({"a": "one"})).await;
        assert_eq!(result.data, json!({"b": "TWO"}));
    }

    #[tokio::test]
    async fn test_empty_pipeline_returns_input() {
        let result = run(json!({"transformations": []}), json!([1, 2])).await;
        assert_eq!(result.data, json!([1, 2]));
        assert_eq!(result.message.as_deref(), Some("Data transformed successfully"));
    }

    #[tokio::test]
    async fn test_missing_input_starts_from_empty_object() {
        let config = json!({"transformations": [{"type": "merge", "mergeWith": {"a": 1}}]});
        let result = TransformHandler.execute(&config, None).await.unwrap();
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_empty_config_defaults_to_no_steps() {
        let result = run(json!({}), json!({"a": 1})).await;
        assert_eq!(result.data, json!({"a": 1}));
    }

    #[test]
    fn test_transform_kind() {
        assert_eq!(TransformHandler.kind(), ActionKind::Transform);
    }

    #[test]
    fn test_transform_describe() {
        let config = json!({"transformations": [{"type": "uppercase"}]});
        assert_eq!(TransformHandler.describe(&config), "Apply 1 transform step(s)");
    }
}
