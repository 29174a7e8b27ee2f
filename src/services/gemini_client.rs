use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    error::{PlanError, Result},
    services::backend::{
        build_http_client, error_from_status, map_send_error, BackendConfig, GenerationRequest,
        GenerativeBackend,
    },
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` backend with JSON structured output.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config.timeout)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn request_body(request: &GenerationRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema.response_schema()
            }
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        let url = build_generate_url(&self.base_url, &self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            return Err(error_from_status(self.name(), status, &headers, &body));
        }

        let response_json: Value = serde_json::from_str(&body).map_err(|err| {
            PlanError::transport(format!("Failed to parse backend envelope: {err}"))
        })?;

        if let Some(reason) = response_json
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
        {
            debug!(target: "cinetrip::backend", backend = self.name(), reason, "prompt blocked");
        }

        Ok(extract_candidate_text(&response_json))
    }
}

fn build_generate_url(base_url: &str, model: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let model = model.trim_start_matches("models/");
    format!("{}/models/{}:generateContent", trimmed, model)
}

/// Concatenate the text parts of the first candidate.
fn extract_candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
