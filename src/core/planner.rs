use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    core::gate::GenerationGate,
    error::{PlanError, Result},
    schemas::{validation::validate_structured_payload, CompletionSchema},
    services::{
        backend::{BackendConfig, GenerationRequest, GenerativeBackend},
        prompt::{build_plan_prompt, PromptOptions},
    },
    types::{plan::TravelPlan, profile::UserProfile, response::deserialize_structured_response},
};

/// Turns a traveler profile into a validated [`TravelPlan`].
///
/// One backend call per `generate`; no caching, no retry. Safe to call
/// again after any failure.
#[derive(Debug, Clone)]
pub struct PlanRequestClient {
    backend: Arc<dyn GenerativeBackend>,
    prompt_options: PromptOptions,
}

impl PlanRequestClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            prompt_options: PromptOptions::default(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Ok(Self::new(config.build_backend()?))
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(&BackendConfig::from_env()?)
    }

    pub fn with_prompt_options(mut self, prompt_options: PromptOptions) -> Self {
        self.prompt_options = prompt_options;
        self
    }

    pub fn with_narrative_language(mut self, language: impl Into<String>) -> Self {
        self.prompt_options.narrative_language = language.into();
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn prompt_options(&self) -> &PromptOptions {
        &self.prompt_options
    }

    pub async fn generate(&self, profile: &UserProfile) -> Result<TravelPlan> {
        info!(
            target: "cinetrip::plan",
            backend = self.backend.name(),
            destination = %profile.destination,
            days = profile.duration,
            "requesting travel plan"
        );

        let request = GenerationRequest {
            prompt: build_plan_prompt(profile, &self.prompt_options),
            schema: TravelPlan::schema().clone(),
        };

        let text = match self.backend.generate(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                error!(target: "cinetrip::plan", backend = self.backend.name(), "backend returned no text");
                return Err(PlanError::EmptyResponse);
            }
            Err(err) => {
                error!(
                    target: "cinetrip::plan",
                    backend = self.backend.name(),
                    code = err.error_code(),
                    error = %err,
                    "plan request failed"
                );
                return Err(err);
            }
        };

        let plan = parse_plan_response(&text)?;

        if plan.itinerary.len() != profile.duration as usize {
            warn!(
                target: "cinetrip::plan",
                requested = profile.duration,
                returned = plan.itinerary.len(),
                "itinerary day count differs from the requested duration"
            );
        }

        info!(
            target: "cinetrip::plan",
            days = plan.itinerary.len(),
            places = plan.place_count(),
            "travel plan ready"
        );
        Ok(plan)
    }

    /// Like [`generate`](Self::generate), but refuses to start while another
    /// gated generation is running.
    pub async fn generate_gated(
        &self,
        gate: &GenerationGate,
        profile: &UserProfile,
    ) -> Result<TravelPlan> {
        let _permit = gate.try_acquire()?;
        self.generate(profile).await
    }
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?i)```(?:json)?").expect("valid regex"))
}

/// Remove markdown code fences some backends wrap around JSON.
pub fn strip_code_fences(text: &str) -> String {
    code_fence().replace_all(text, "").trim().to_string()
}

/// Raw backend text to a schema-checked plan. All-or-nothing.
pub fn parse_plan_response(text: &str) -> Result<TravelPlan> {
    let cleaned = strip_code_fences(text);

    let payload: Value = serde_json::from_str(&cleaned).map_err(|err| {
        error!(
            target: "cinetrip::schema",
            error = %err,
            raw = %text,
            "backend text is not valid JSON"
        );
        PlanError::MalformedResponse(format!("response is not valid JSON: {err}"))
    })?;

    let schema = TravelPlan::schema();
    if let Err(err) = validate_structured_payload(schema, &payload) {
        error!(target: "cinetrip::schema", raw = %text, "backend JSON failed schema validation");
        return Err(err);
    }

    deserialize_structured_response::<TravelPlan>(&payload, schema)
}
