use crate::schemas::{CompletionSchema, SchemaHandle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Cinema-themed travel plan returned by the generative backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    /// Film-style title describing the traveler's persona for this trip
    pub personality_title: String,
    /// Narrative synopsis framing the trip as a movie
    pub personality_description: String,
    /// How well the trip matches the traveler's vibe, 0 to 100
    #[schemars(range(min = 0.0, max = 100.0))]
    pub vibe_score: f64,
    /// Total estimated budget for the whole trip in `currency`
    pub total_estimated_budget: f64,
    /// Currency code for all monetary fields (e.g. "KRW", "EUR")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// One entry per requested day, in order
    #[schemars(length(min = 1))]
    pub itinerary: Vec<DayItinerary>,
    /// Local etiquette tips for the destination
    pub local_etiquette: Vec<String>,
    /// Exactly five real songs that fit the trip's mood
    pub soundtrack: Vec<Song>,
    /// Real films shot in or set at the destination
    pub movies: Vec<Movie>,
}

/// One day of the itinerary. Places are in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayItinerary {
    /// 1-based day counter
    pub day: u32,
    /// Scenes of the day from morning to night
    #[schemars(length(min = 1))]
    pub places: Vec<Place>,
}

/// A single scene: a real, currently operating venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Venue name
    pub name: String,
    /// Full street address searchable on a map
    pub address: String,
    /// Scene description
    pub description: String,
    /// Narrated docent script for the scene
    pub docent_script: String,
    /// Latitude in decimal degrees
    #[schemars(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    /// Longitude in decimal degrees
    #[schemars(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Single English category keyword (e.g. "cafe", "museum")
    pub image_keyword: String,
    /// Estimated spend in local currency; absent means free or unestimated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    /// Best time of day to visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<String>,
    /// Outfit suggestion for the scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfit_tip: Option<String>,
    /// Where to take the best photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_spot_tip: Option<String>,
}

/// Soundtrack entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Song {
    pub title: String,
    pub artist: String,
    /// Why the song fits the trip
    pub reason: String,
}

/// Film recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Movie {
    pub title: String,
    pub director: String,
    /// Release year, kept as text the way the backend returns it
    pub year: String,
    /// Verifiable link between the film and the destination
    pub reason: String,
}

impl CompletionSchema for TravelPlan {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| SchemaHandle::for_type::<Self>("TravelPlan"))
    }
}

impl TravelPlan {
    /// All places across all days, in itinerary order.
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.itinerary.iter().flat_map(|day| day.places.iter())
    }

    pub fn place_count(&self) -> usize {
        self.itinerary.iter().map(|day| day.places.len()).sum()
    }

    /// Sum of the per-place estimates that are present.
    pub fn estimated_place_costs(&self) -> f64 {
        self.places().filter_map(|place| place.estimated_cost).sum()
    }

    /// Copy of the plan with the ticket's cosmetic edits applied.
    ///
    /// Only the title and the synopsis are editable on the ticket; the
    /// itinerary stays exactly as generated.
    pub fn with_ticket_edits(
        &self,
        title: Option<String>,
        description: Option<String>,
    ) -> TravelPlan {
        let mut edited = self.clone();
        if let Some(title) = title {
            edited.personality_title = title;
        }
        if let Some(description) = description {
            edited.personality_description = description;
        }
        edited
    }
}
