use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use crate::{
    backends::ScriptBackend,
    decode::parse_segments,
    error::{Result, ScriptError},
    provider::Provider,
    types::ScriptSegment,
};

const BACKEND: &str = "Local";

/// Ollama `/api/generate` client with JSON output and streaming disabled.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    client: reqwest::Client,
    url: Url,
    endpoint: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl LocalBackend {
    pub fn new(client: reqwest::Client, endpoint: &str, model: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(ScriptError::MissingEndpoint);
        }

        let url = Url::parse(endpoint).map_err(|e| ScriptError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScriptError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: format!("unsupported scheme `{}`", url.scheme()),
            });
        }

        Ok(Self {
            client,
            url,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "prompt": prompt,
            "format": "json",
            "stream": false,
        })
    }
}

#[async_trait]
impl ScriptBackend for LocalBackend {
    fn provider(&self) -> Provider {
        Provider::Local
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<ScriptSegment>> {
        tracing::debug!(url = %self.endpoint, model = %self.model, "Sending local request");

        // Only connect and timeout failures mean the server is unreachable.
        let response = self
            .client
            .post(self.url.clone())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|source| {
                if source.is_connect() || source.is_timeout() {
                    ScriptError::Unreachable {
                        url: self.endpoint.clone(),
                        source,
                    }
                } else {
                    ScriptError::ApiError(source)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScriptError::Backend {
                backend: BACKEND,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ScriptError::InvalidShape {
                backend: BACKEND,
                reason: format!("missing or invalid `response` field ({e})"),
            })?;

        parse_segments(BACKEND, &parsed.response)
    }
}
