use crate::types::profile::UserProfile;

/// Category keywords the backend may use for `imageKeyword`.
pub const IMAGE_KEYWORDS: &[&str] = &[
    "cafe",
    "restaurant",
    "museum",
    "nature",
    "bar",
    "shopping",
    "photo",
    "landmark",
    "nightview",
    "market",
];

/// Number of songs requested for the soundtrack.
pub const SOUNDTRACK_SIZE: usize = 5;

/// Knobs for the planning prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptOptions {
    /// Language for every narrative field (titles, scripts, tips)
    pub narrative_language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            narrative_language: "English".to_string(),
        }
    }
}

/// Build the planning instruction sent to the generative backend.
///
/// The constraints are requests to the model; nothing here enforces them.
/// Only the output schema is enforced, after the response comes back.
pub fn build_plan_prompt(profile: &UserProfile, options: &PromptOptions) -> String {
    let hobbies = if profile.hobbies.is_empty() {
        "no particular preference".to_string()
    } else {
        profile.hobbies.join(", ")
    };
    let destination = profile.destination.as_str();
    let language = options.narrative_language.as_str();

    let mut lines = vec![
        "You are a world-renowned film director and travel curator.".to_string(),
        format!(
            "Write a travel scenario that plays like a classic film, built only from places that really exist in {destination}."
        ),
        String::new(),
        "Traveler brief:".to_string(),
        format!("- Destination: {destination}"),
        format!("- Start date: {}", profile.travel_date.format("%Y-%m-%d")),
        format!("- Duration: {} days", profile.duration),
        format!("- Travelers: {}", profile.travelers),
        format!(
            "- Traveler: {} years old, {}, {}",
            profile.age, profile.gender, profile.nationality
        ),
        format!("- Interests: {hobbies}"),
        format!("- Travel style: {}", profile.travel_style),
        format!("- Rhythm: {}", profile.activity_time),
        String::new(),
        "Binding rules:".to_string(),
        format!(
            "1. Real places only: recommend only restaurants, cafes, sights and venues currently operating in {destination}. Invented places are forbidden."
        ),
        "2. Exact addresses: the `address` field must hold the real street address, searchable on Google Maps; `lat`/`lng` must be that address's coordinates.".to_string(),
        format!(
            "3. Cinematic framing: write `personalityTitle` and `personalityDescription` in {language} with an evocative, film-like voice."
        ),
        format!(
            "4. Language: write every text field in {language}, except `imageKeyword`, which must be exactly one English word from: {}.",
            IMAGE_KEYWORDS.join(", ")
        ),
        "5. Scenario format: describe each place like a scene from a screenplay; `docentScript` is the narration for that scene.".to_string(),
        format!(
            "6. Soundtrack: choose exactly {SOUNDTRACK_SIZE} real, existing songs (pop, jazz, local music) that heighten the mood of this trip."
        ),
        format!(
            "7. Movies (factual accuracy required): first recommend films shot in or set in {destination}. If none exist, recommend a masterpiece representative of the country or matching the season and mood of the trip. Never invent filming locations or plot facts; every `reason` must be verifiable."
        ),
        "8. Full days: each day must include at least 4-5 places covering morning, lunch, an afternoon activity, dinner and a night activity (bar, night view).".to_string(),
        format!(
            "9. Return exactly {} entries in `itinerary`, numbered from day 1.",
            profile.duration
        ),
    ];

    if profile.travelers > 1 {
        lines.push(format!(
            "10. Budget figures cover all {} travelers.",
            profile.travelers
        ));
    }

    lines.join("\n")
}
