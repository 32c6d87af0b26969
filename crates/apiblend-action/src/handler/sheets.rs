//! Google Sheets simulation handler.
//!
//! Emulates a spreadsheet integration: waits a fixed latency, then
//! synthesizes either an updated-cell summary (`write`/`append`) or a
//! fixed illustrative dataset (`read`, the default). Placeholder for a
//! real integration; only the envelope shape is binding.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use apiblend_core::{ActionKind, ExecutionResult};

use crate::error::ActionError;
use crate::handler::ActionHandler;

const SIMULATED_LATENCY: Duration = Duration::from_millis(400);
const DEFAULT_RANGE: &str = "A1:D10";

/// Configuration for the sheets action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
    #[serde(default = "default_operation")]
    pub operation: String,
}

fn default_operation() -> String {
    "read".to_string()
}

/// Simulated handler for spreadsheet actions.
pub struct SheetsSimulationHandler;

#[async_trait]
impl ActionHandler for SheetsSimulationHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Sheets
    }

    async fn execute(
        &self,
        config: &Value,
        _input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: SheetsConfig = serde_json::from_value(config.clone())?;

        tokio::time::sleep(SIMULATED_LATENCY).await;

        let spreadsheet_id = config
            .spreadsheet_id
            .unwrap_or_else(|| format!("sheet_{}", Uuid::new_v4().simple()));
        let range = config.range.unwrap_or_else(|| DEFAULT_RANGE.to_string());

        tracing::info!(
            spreadsheet_id = %spreadsheet_id,
            operation = %config.operation,
            "Sheets operation simulated"
        );

        let result = match config.operation.as_str() {
            "write" | "append" => {
                let rows = config
                    .values
                    .as_ref()
                    .map(|v| v.len())
                    .filter(|n| *n > 0)
                    .unwrap_or(1);
                let columns = config
                    .values
                    .as_ref()
                    .and_then(|v| v.first())
                    .map(|row| row.len())
                    .filter(|n| *n > 0)
                    .unwrap_or(4);
                let verb = if config.operation == "append" { "Appended" } else { "Wrote" };
                ExecutionResult::success(json!({
                    "spreadsheetId": spreadsheet_id,
                    "updatedRange": range,
                    "updatedRows": rows,
                    "updatedColumns": columns,
                    "updatedCells": rows * columns,
                    "operation": config.operation,
                }))
                .with_message(format!("{} data to Google Sheets (simulated)", verb))
            }
            // Anything else reads, including unrecognized operations.
            _ => ExecutionResult::success(json!({
                "spreadsheetId": spreadsheet_id,
                "range": range,
                "values": [
                    ["Name", "Email", "Status", "Date"],
                    ["Alice Johnson", "alice@example.com", "active", "2025-01-15"],
                    ["Bob Smith", "bob@example.com", "pending", "2025-01-14"],
                    ["Carol Diaz", "carol@example.com", "active", "2025-01-13"],
                ],
            }))
            .with_message("Read data from Google Sheets (simulated)"),
        };
        Ok(result)
    }

    fn describe(&self, config: &Value) -> String {
        let operation = config
            .get("operation")
            .and_then(|v| v.as_str())
            .unwrap_or("read");
        let range = config
            .get("range")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_RANGE);
        format!("Sheets {} on {}", operation, range)
    }
}
