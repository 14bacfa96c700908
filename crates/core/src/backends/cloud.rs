use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{
    backends::ScriptBackend,
    config::{CLOUD_TEMPERATURE, CloudConfig},
    decode::parse_segments,
    error::{Result, ScriptError},
    provider::Provider,
    types::ScriptSegment,
};

const BACKEND: &str = "Cloud";

/// Gemini `generateContent` client constrained to the segment schema.
#[derive(Clone)]
pub struct CloudBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for CloudBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudBackend")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl CloudBackend {
    pub fn new(client: reqwest::Client, config: &CloudConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or(ScriptError::MissingApiKey)?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }],
                },
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": segment_schema(),
                "temperature": CLOUD_TEMPERATURE,
            },
        })
    }
}

#[async_trait]
impl ScriptBackend for CloudBackend {
    fn provider(&self) -> Provider {
        Provider::Cloud
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<ScriptSegment>> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending cloud request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScriptError::Backend {
                backend: BACKEND,
                status: status.as_u16(),
                body: api_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ScriptError::InvalidShape {
                backend: BACKEND,
                reason: format!("unexpected response body ({e})"),
            })?;

        let text = parsed.into_text()?;
        parse_segments(BACKEND, &text)
    }
}

/// Response schema matching [`ScriptSegment`].
fn segment_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "timestamp": {
                    "type": "STRING",
                    "description": "The estimated start and end time of the segment, e.g., \"00:00 - 00:15\".",
                },
                "narration": {
                    "type": "STRING",
                    "description": "The spoken script for the narrator in this segment.",
                },
                "broll": {
                    "type": "STRING",
                    "description": "A detailed description of the visual B-roll, on-screen text, or actions for this segment.",
                },
            },
            "required": ["timestamp", "narration", "broll"],
        },
    })
}

/// Pull `error.message` out of a Gemini error body, else return the body as is.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Result<String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = match block_reason {
                Some(reason) => format!("prompt was blocked ({reason})"),
                None => "response contained no candidates".to_string(),
            };
            return Err(ScriptError::EmptyResponse {
                backend: BACKEND,
                reason,
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = match candidate.finish_reason {
                Some(finish) => format!("candidate has no text (finish reason {finish})"),
                None => "candidate has no text".to_string(),
            };
            return Err(ScriptError::EmptyResponse {
                backend: BACKEND,
                reason,
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> CloudBackend {
        let config = CloudConfig {
            api_key: Some("k".into()),
            base_url: "https://api.example.com/v1beta/".into(),
            ..CloudConfig::default()
        };
        CloudBackend::new(reqwest::Client::new(), &config).unwrap()
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = CloudConfig {
            api_key: Some("  ".into()),
            ..CloudConfig::default()
        };
        assert!(matches!(
            CloudBackend::new(reqwest::Client::new(), &config),
            Err(ScriptError::MissingApiKey)
        ));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        assert_eq!(
            backend().endpoint(),
            "https://api.example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn body_constrains_output() {
        let body = backend().request_body("write it");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "write it");
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["temperature"], 0.7);
        assert_eq!(config["responseSchema"]["type"], "ARRAY");
        assert_eq!(
            config["responseSchema"]["items"]["required"],
            json!(["timestamp", "narration", "broll"])
        );
    }

    #[test]
    fn debug_hides_key() {
        assert!(!format!("{:?}", backend()).contains("\"k\""));
    }

    #[test]
    fn extracts_api_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "API key not valid.");
        assert_eq!(api_error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn joins_candidate_parts() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[{\"a\":"},{"text":"1}]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().unwrap(), r#"[{"a":1}]"#);
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        let err = parsed.into_text().unwrap_err();
        assert!(err.to_string().contains("prompt was blocked (SAFETY)"));
    }
}
