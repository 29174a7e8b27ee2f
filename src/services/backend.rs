use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{header::HeaderMap, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::{
    error::{PlanError, Result},
    schemas::SchemaHandle,
    services::{gemini_client::GeminiClient, openai_client::OpenAIClient},
};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A single structured-output generation call.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub schema: SchemaHandle,
}

/// External generative text service.
///
/// Implementations own transport, auth and rate limiting. They return the
/// raw text payload (possibly fenced JSON) or `None` when the service
/// answered without any text. They must not retry.
#[async_trait]
pub trait GenerativeBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenRouter,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenRouter => "openai/gpt-4.1-mini",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenRouter => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = PlanError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openrouter" | "openai" => Ok(Provider::OpenRouter),
            other => Err(PlanError::Config(format!(
                "unknown provider `{other}` (expected `gemini` or `openrouter`)"
            ))),
        }
    }
}

/// Backend credentials and transport settings, injected at construction.
#[derive(Clone)]
pub struct BackendConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BackendConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("CINETRIP_PROVIDER") {
            Some(value) => value.parse()?,
            None => Provider::Gemini,
        };

        let api_key = lookup(provider.api_key_var())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PlanError::Config(format!(
                    "{} environment variable must be set for the {:?} backend",
                    provider.api_key_var(),
                    provider
                ))
            })?;

        let mut config = Self::new(provider, api_key);

        if let Some(model) = lookup("CINETRIP_MODEL") {
            config.model = model;
        }

        config.base_url = lookup("CINETRIP_BASE_URL").or_else(|| match provider {
            Provider::OpenRouter => {
                lookup("OPENAI_BASE_URL").or_else(|| lookup("OPENROUTER_BASE_URL"))
            }
            Provider::Gemini => None,
        });

        if let Some(secs) = lookup("CINETRIP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PlanError::Config(format!("CINETRIP_TIMEOUT_SECS must be an integer, got `{secs}`"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn build_backend(&self) -> Result<Arc<dyn GenerativeBackend>> {
        let backend: Arc<dyn GenerativeBackend> = match self.provider {
            Provider::Gemini => Arc::new(GeminiClient::from_config(self)?),
            Provider::OpenRouter => Arc::new(OpenAIClient::from_config(self)?),
        };
        Ok(backend)
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| PlanError::Config(format!("Failed to build HTTP client: {err}")))
}

pub(crate) fn map_send_error(err: reqwest::Error) -> PlanError {
    if err.is_timeout() {
        PlanError::Timeout(format!("backend request timed out: {err}"))
    } else {
        PlanError::transport(format!("HTTP request failed: {err}"))
    }
}

/// Turn a non-success HTTP answer into a typed transport error.
pub(crate) fn error_from_status(
    backend: &'static str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> PlanError {
    warn!(
        target: "cinetrip::backend",
        backend,
        status = status.as_u16(),
        "backend call failed"
    );

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(1);
        return PlanError::RateLimit {
            retry_after: retry_after.max(1),
        };
    }

    let api_message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    PlanError::http(
        status.as_u16(),
        format!("HTTP {} error: {}", status, api_message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_to_gemini() {
        let config = BackendConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "g-key")])).unwrap();

        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_openrouter_from_env() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("CINETRIP_PROVIDER", "openrouter"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENROUTER_BASE_URL", "http://localhost:9999/v1"),
            ("CINETRIP_MODEL", "anthropic/claude-sonnet-4"),
            ("CINETRIP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.provider, Provider::OpenRouter);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999/v1"));
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = BackendConfig::from_lookup(lookup(&[("CINETRIP_PROVIDER", "gemini")]))
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_unknown_provider() {
        assert!("bard".parse::<Provider>().is_err());
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenRouter);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = BackendConfig::new(Provider::Gemini, "super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_error_from_status() {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "7".parse().unwrap());
        let err = error_from_status("gemini", StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert!(matches!(err, PlanError::RateLimit { retry_after: 7 }));

        let err = error_from_status(
            "gemini",
            StatusCode::FORBIDDEN,
            &HeaderMap::new(),
            r#"{"error":{"message":"API key not valid"}}"#,
        );
        assert!(matches!(err, PlanError::Transport { status: Some(403), .. }));
        assert!(err.to_string().contains("API key not valid"));
        assert!(!err.is_retryable());
    }
}
