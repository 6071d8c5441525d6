use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::app::ports::CompletionPort;
use crate::common::error::{PipelineError, Result};

/// Reqwest-backed adapter for the text-completion service. The exact
/// service is deployment configuration: endpoint and API key both come
/// from the environment.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("PRICEBOOK_API_KEY")
            .map_err(|_| PipelineError::Config("PRICEBOOK_API_KEY is not set".to_string()))?;
        let endpoint = std::env::var("PRICEBOOK_COMPLETION_URL").map_err(|_| {
            PipelineError::Config("PRICEBOOK_COMPLETION_URL is not set".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl CompletionPort for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, String> {
        tracing::debug!(endpoint = %self.endpoint, "sending completion request");
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("completion service returned {}", resp.status()));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
        body.get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| "completion response missing 'text' field".to_string())
    }
}
