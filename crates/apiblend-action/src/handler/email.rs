//! Email simulation handler.
//!
//! Emulates an outbound email provider: waits a fixed latency, then
//! synthesizes a delivery receipt without sending anything. Placeholder
//! for a real integration; only the envelope shape is binding, and a real
//! implementation must replace this type rather than extend it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use apiblend_core::{ActionKind, ExecutionResult};

use crate::error::ActionError;
use crate::handler::{input_str, ActionHandler};

const SIMULATED_LATENCY: Duration = Duration::from_millis(500);
const DEFAULT_RECIPIENT: &str = "recipient@example.com";

/// Configuration for the email action. Fields fall back to the input
/// payload, then to fixed defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Simulated handler for email actions.
pub struct EmailSimulationHandler;

#[async_trait]
impl ActionHandler for EmailSimulationHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Email
    }

    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: EmailConfig = serde_json::from_value(config.clone())?;

        tokio::time::sleep(SIMULATED_LATENCY).await;

        let to = config
            .to
            .or_else(|| input_str(input, "to"))
            .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());
        let subject = config
            .subject
            .or_else(|| input_str(input, "subject"))
            .unwrap_or_else(|| "(no subject)".to_string());
        let body = config
            .body
            .or_else(|| input_str(input, "body"))
            .unwrap_or_default();

        tracing::info!(to = %to, subject = %subject, "Email delivery simulated");

        let data = json!({
            "messageId": format!("msg_{}", Uuid::new_v4().simple()),
            "to": to,
            "subject": subject,
            "body": body,
            "sentAt": Utc::now().to_rfc3339(),
            "status": "sent",
        });
        Ok(ExecutionResult::success(data).with_message("Email sent (simulated)"))
    }

    fn describe(&self, config: &Value) -> String {
        let to = config
            .get("to")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_RECIPIENT);
        format!("Send email to {}", to)
    }
}
