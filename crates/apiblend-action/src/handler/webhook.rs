//! Webhook action handler.
//!
//! Delivers the incoming payload to a caller-supplied URL and mirrors the
//! upstream response in the result envelope.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};

use apiblend_core::{ActionKind, ExecutionResult, ResponseBody};

use crate::error::ActionError;
use crate::handler::ActionHandler;

/// Configuration for the webhook action.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_method() -> String {
    "POST".to_string()
}

/// Handler for webhook actions.
///
/// Performs exactly one outbound call, no retries. Transport failures
/// propagate as [`ActionError::Http`] and become failure envelopes at the
/// dispatcher boundary.
pub struct WebhookHandler {
    client: Client,
}

impl WebhookHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionHandler for WebhookHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Webhook
    }

    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: WebhookConfig = serde_json::from_value(config.clone())?;

        let Some(url) = config.url.filter(|u| !u.is_empty()) else {
            return Ok(ExecutionResult::failure("URL is required for webhook"));
        };

        let method = Method::from_bytes(config.method.to_uppercase().as_bytes())
            .map_err(|_| ActionError::InvalidMethod(config.method.clone()))?;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if method != Method::GET {
            let payload = input.cloned().unwrap_or_else(|| json!({}));
            request = request.body(serde_json::to_string(&payload)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = ResponseBody::parse(&response.text().await?);

        tracing::info!(url = %url, status = status.as_u16(), "Webhook call completed");

        let result = if status.is_success() {
            ExecutionResult::success(body.into_value())
        } else {
            ExecutionResult::failure(format!("Webhook returned HTTP {}", status))
        };
        let result = result.with_status(status.as_u16());
        Ok(match status.canonical_reason() {
            Some(reason) => result.with_status_text(reason),
            None => result,
        })
    }

    fn describe(&self, config: &Value) -> String {
        let url = config
            .get("url")
            .and_then(|v| v.as_str())
            .unwrap_or("<no url>");
        format!("Call webhook: {}", url)
    }
}
