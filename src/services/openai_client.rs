use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    error::{PlanError, Result},
    services::backend::{
        build_http_client, error_from_status, map_send_error, BackendConfig, GenerationRequest,
        GenerativeBackend,
    },
};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const SYSTEM_PROMPT: &str = "You are a world-class film director and travel curator. Reply with a single JSON object that matches the requested schema and nothing else.";

/// OpenAI-compatible chat completions backend (OpenRouter by default).
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIClient {
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

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let messages = vec![
            json!({ "role": "system", "content": SYSTEM_PROMPT }),
            json!({ "role": "user", "content": request.prompt }),
        ];

        ChatCompletionRequest::new(self.model.clone(), messages)
            .with_response_format(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.schema_name(),
                    "strict": false,
                    "schema": request.schema.schema_json()
                }
            }))
            .into_value()
    }
}

#[async_trait]
impl GenerativeBackend for OpenAIClient {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        let request_url = build_chat_url(&self.base_url);

        let response = self
            .http
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "cine-trip-rs")
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            return Err(error_from_status(
                self.name(),
                status,
                &headers,
                &response_text,
            ));
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
            PlanError::transport(format!("Failed to parse backend envelope: {err}"))
        })?;

        // OpenRouter reports some upstream failures with a 200 status
        if let Some(error) = response_json.get("error") {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(PlanError::transport(format!("API error: {}", error_message)));
        }

        Ok(response_json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())
            .map(str::to_string))
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            response_format: None,
        }
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
