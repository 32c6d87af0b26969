//! Filter action handler.
//!
//! Evaluates per-item conditions over a list and keeps the items that
//! match, preserving their relative order. Unknown operators evaluate as
//! always-true so a malformed condition includes items instead of
//! silently emptying the result set.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use apiblend_core::{ActionKind, ExecutionResult};

use crate::error::ActionError;
use crate::handler::ActionHandler;

/// Configuration for the filter action.
///
/// Conditions are kept as raw values so a single malformed condition
/// degrades to always-true instead of failing the whole call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub conditions: Vec<Value>,
    #[serde(default)]
    pub logic: FilterLogic,
}

/// How per-condition results combine for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FilterLogic {
    /// Every condition must hold. Vacuously true on an empty list.
    #[default]
    And,
    /// At least one condition must hold. False on an empty list.
    Or,
}

impl From<String> for FilterLogic {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OR" => FilterLogic::Or,
            // Unrecognized values fall back to the default combination.
            _ => FilterLogic::And,
        }
    }
}

/// A single field/operator/value test evaluated per candidate item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterCondition {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Comparison operator for a filter condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    Exists,
    /// Anything outside the known set; evaluates as always-true.
    #[default]
    Unknown,
}

impl From<String> for FilterOperator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "equals" => FilterOperator::Equals,
            "notEquals" => FilterOperator::NotEquals,
            "contains" => FilterOperator::Contains,
            "greaterThan" => FilterOperator::GreaterThan,
            "lessThan" => FilterOperator::LessThan,
            "exists" => FilterOperator::Exists,
            _ => FilterOperator::Unknown,
        }
    }
}

impl FilterCondition {
    /// Evaluate this condition against one candidate item.
    fn matches(&self, item: &Value) -> bool {
        let field_value = item.get(&self.field);
        match self.operator {
            // Strict JSON equality, no type coercion. An absent field and
            // an absent operand compare equal to each other.
            FilterOperator::Equals => field_value == self.value.as_ref(),
            FilterOperator::NotEquals => field_value != self.value.as_ref(),
            FilterOperator::Contains => match (field_value, self.value.as_ref()) {
                (Some(field), Some(value)) => {
                    coerce_string(field).contains(&coerce_string(value))
                }
                _ => false,
            },
            FilterOperator::GreaterThan => compare_numeric(field_value, self.value.as_ref(), |a, b| a > b),
            FilterOperator::LessThan => compare_numeric(field_value, self.value.as_ref(), |a, b| a < b),
            FilterOperator::Exists => matches!(field_value, Some(v) if !v.is_null()),
            FilterOperator::Unknown => true,
        }
    }
}

/// String coercion for `contains`: strings compare by content, everything
/// else by its JSON rendering.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric comparison for `greaterThan`/`lessThan`. Sides that do not
/// coerce to a number never match.
fn compare_numeric(
    field: Option<&Value>,
    operand: Option<&Value>,
    cmp: fn(f64, f64) -> bool,
) -> bool {
    match (field.and_then(coerce_number), operand.and_then(coerce_number)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Number coercion: JSON numbers as-is, numeric strings parsed, booleans
/// as 0/1.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Handler for filter actions. Always reports success.
pub struct FilterHandler;

#[async_trait]
impl ActionHandler for FilterHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Filter
    }

    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: FilterConfig = serde_json::from_value(config.clone())?;

        let conditions: Vec<FilterCondition> = config
            .conditions
            .iter()
            .map(|raw| serde_json::from_value(raw.clone()).unwrap_or_default())
            .collect();

        let items: Vec<Value> = match input.cloned() {
            Some(Value::Array(items)) => items,
            Some(other) => vec![other],
            None => vec![Value::Null],
        };
        let total = items.len();

        let retained: Vec<Value> = items
            .into_iter()
            .filter(|item| match config.logic {
                FilterLogic::And => conditions.iter().all(|c| c.matches(item)),
                FilterLogic::Or => conditions.iter().any(|c| c.matches(item)),
            })
            .collect();
        let count = retained.len();

        tracing::debug!(retained = count, total = total, "Filter applied");

        Ok(ExecutionResult::success(Value::Array(retained))
            .with_count(count)
            .with_message(format!("Filtered {} of {} items", count, total)))
    }

    fn describe(&self, config: &Value) -> String {
        let conditions = config
            .get("conditions")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0);
        format!("Filter on {} condition(s)", conditions)
    }
}
