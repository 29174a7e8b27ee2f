//! cine-trip-rs: cinema-themed travel itineraries from a generative backend
//!
//! The crate turns a traveler profile into a schema-checked [`TravelPlan`]
//! (days of real, geocoded places plus a soundtrack and film list) and
//! recommends a lodging area from the plan's coordinates.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cine_trip_rs::{LocationRecommender, PlanRequestClient, UserProfile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlanRequestClient::from_env()?;
//!     let profile: UserProfile = serde_json::from_str(&std::fs::read_to_string("profile.json")?)?;
//!     let profile = profile.clamped();
//!
//!     let plan = client.generate(&profile).await?;
//!     let base = LocationRecommender::new().recommend(&plan, &profile.destination);
//!     println!("{}: {}", base.area, base.reason);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod schemas;
pub(crate) mod services;
pub mod types;

pub use crate::core::{
    location::{classify_place, extract_area, AreaMatch, AreaRule, DEFAULT_AREA},
    parse_plan_response, strip_code_fences, GatePermit, GenerationGate, LocationRecommendation,
    LocationRecommender, PlanRequestClient, RecommendationBasis,
};
pub use error::{PlanError, Result};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::{
    backend::{BackendConfig, GenerationRequest, GenerativeBackend, Provider},
    gemini_client::GeminiClient,
    openai_client::OpenAIClient,
    prompt::{build_plan_prompt, PromptOptions, IMAGE_KEYWORDS},
    retry::{retry_with_backoff, RetryPolicy},
    sanitize::{sanitize_text, validate_string_array, validate_text_input},
};
pub use types::{
    deserialize_structured_response, ActivityTime, DayItinerary, Gender, Movie, NewTrip, Place,
    SavedTrip, Song, TravelPlan, TravelStyle, TripContent, TripDates, UserProfile,
};

#[cfg(feature = "cli")]
pub mod cli;
