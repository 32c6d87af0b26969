//! Generic HTTP request action handler.
//!
//! Like the webhook handler, but defaults to `GET` and lets the config
//! carry an explicit request body that takes precedence over the input.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};

use apiblend_core::{ActionKind, ExecutionResult, ResponseBody};

use crate::error::ActionError;
use crate::handler::ActionHandler;

/// Configuration for the generic HTTP action.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Handler for generic HTTP request actions.
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionHandler for HttpHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Http
    }

    async fn execute(
        &self,
        config: &Value,
        input: Option<&Value>,
    ) -> Result<ExecutionResult, ActionError> {
        let config: HttpConfig = serde_json::from_value(config.clone())?;

        let Some(url) = config.url.filter(|u| !u.is_empty()) else {
            return Ok(ExecutionResult::failure("URL is required"));
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
            let payload = config
                .body
                .or_else(|| input.cloned())
                .unwrap_or_else(|| json!({}));
            request = request.body(serde_json::to_string(&payload)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = ResponseBody::parse(&response.text().await?);

        tracing::info!(url = %url, status = status.as_u16(), "HTTP call completed");

        let result = if status.is_success() {
            ExecutionResult::success(body.into_value())
        } else {
            ExecutionResult::failure(format!("Request returned HTTP {}", status))
        };
        Ok(result.with_status(status.as_u16()))
    }

    fn describe(&self, config: &Value) -> String {
        let method = config
            .get("method")
            .and_then(|v| v.as_str())
            .unwrap_or("GET");
        let url = config
            .get("url")
            .and_then(|v| v.as_str())
            .unwrap_or("<no url>");
        format!("HTTP {} {}", method, url)
    }
}
