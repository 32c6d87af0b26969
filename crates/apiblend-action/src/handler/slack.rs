//! Slack message action handler.
//!
//! With a configured webhook URL this posts a real message; without one it
//! falls back to a simulated delivery. The simulation branch is a
//! placeholder with the same caveats as the other simulated handlers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use apiblend_core::{ActionKind, ExecutionResult};

use crate::error::ActionError;
use crate::handler::{input_str, ActionHandler};

const SIMULATED_LATENCY: Duration = Duration::from_millis(300);
const DEFAULT_CHANNEL: &str = "#general";
const DEFAULT_MESSAGE: &str = "Test message from APIBlend";

/// Configuration for the Slack action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackConfig {
    /// Incoming-webhook URL. Presence switches from simulation to a real
    /// outbound POST.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Handler for Slack message actions.
pub struct SlackHandler {
    client: Client,
}

impl SlackHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionHandler for SlackHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Slack
    }

    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: SlackConfig = serde_json::from_value(config.clone())?;

        let channel = config.channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string());
        let text = config
            .message
            .or_else(|| input_str(input, "message"))
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        if let Some(url) = config.webhook_url.filter(|u| !u.is_empty()) {
            let payload = json!({"channel": channel, "text": text});
            let response = self.client.post(&url).json(&payload).send().await?;
            let status = response.status();

            tracing::info!(channel = %channel, status = status.as_u16(), "Slack webhook posted");

            let result = if status.is_success() {
                ExecutionResult::success(json!({"status": "sent"}))
                    .with_message("Message delivered to Slack")
            } else {
                ExecutionResult::failure(format!("Slack webhook returned HTTP {}", status))
            };
            return Ok(result);
        }

        // No webhook URL configured: simulate the delivery.
        tokio::time::sleep(SIMULATED_LATENCY).await;

        tracing::info!(channel = %channel, "Slack delivery simulated");

        let data = json!({
            "channel": channel,
            "message": text,
            "timestamp": Utc::now().timestamp_millis(),
            "status": "delivered",
        });
        Ok(ExecutionResult::success(data).with_message("Message delivered to Slack (simulated)"))
    }

    fn describe(&self, config: &Value) -> String {
        let channel = config
            .get("channel")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_CHANNEL);
        format!("Send Slack message to {}", channel)
    }
}
