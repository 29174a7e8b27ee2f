use crate::{
    error::{PlanError, Result},
    services::sanitize::sanitize_text,
    types::{
        plan::{DayItinerary, TravelPlan},
        profile::UserProfile,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inclusive start and the day after the last night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TripDates {
    pub fn from_start(start_date: NaiveDate, duration_days: u32) -> Self {
        Self {
            start_date,
            end_date: start_date + chrono::Days::new(u64::from(duration_days)),
        }
    }
}

/// Everything shown on the result screen, kept for exact reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripContent {
    pub plan: TravelPlan,
    pub profile: UserProfile,
}

/// A trip about to be saved; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub user_id: String,
    pub city: String,
    pub dates: TripDates,
    pub itinerary: Vec<DayItinerary>,
    pub hotel_info: Option<Value>,
    pub synopsis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TripContent>,
}

impl NewTrip {
    pub fn from_plan(
        user_id: impl Into<String>,
        profile: &UserProfile,
        plan: &TravelPlan,
    ) -> Result<Self> {
        let city = sanitize_text(&profile.destination);
        if city.is_empty() {
            return Err(PlanError::InvalidInput(
                "destination city must not be empty".to_string(),
            ));
        }

        let synopsis = sanitize_text(&format!(
            "{}\n\n{}",
            plan.personality_title, plan.personality_description
        ));

        Ok(Self {
            user_id: user_id.into(),
            city,
            dates: TripDates::from_start(profile.travel_date, profile.duration),
            itinerary: plan.itinerary.clone(),
            hotel_info: None,
            synopsis,
            content: Some(TripContent {
                plan: plan.clone(),
                profile: profile.clone(),
            }),
        })
    }

    pub fn with_hotel_info(mut self, hotel_info: Value) -> Self {
        self.hotel_info = Some(hotel_info);
        self
    }

    /// Drop the full content snapshot, for stores without a content column.
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }
}

/// Persisted trip record. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrip {
    pub id: String,
    pub user_id: String,
    pub city: String,
    pub dates: TripDates,
    pub itinerary: Vec<DayItinerary>,
    pub hotel_info: Option<Value>,
    pub synopsis: String,
    #[serde(default)]
    pub content: Option<TripContent>,
    pub created_at: DateTime<Utc>,
}

impl SavedTrip {
    pub fn from_new(id: impl Into<String>, trip: NewTrip, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: trip.user_id,
            city: trip.city,
            dates: trip.dates,
            itinerary: trip.itinerary,
            hotel_info: trip.hotel_info,
            synopsis: trip.synopsis,
            content: trip.content,
            created_at,
        }
    }

    /// Reads and deletes are scoped to the owner.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn content(&self) -> Option<&TripContent> {
        self.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        plan::Place,
        profile::{ActivityTime, Gender, TravelStyle},
    };
    use serde_json::json;

    fn profile(destination: &str) -> UserProfile {
        UserProfile {
            age: 34,
            gender: Gender::Female,
            nationality: "French".to_string(),
            hobbies: vec!["architecture".to_string()],
            travel_style: TravelStyle::Luxury,
            destination: destination.to_string(),
            duration: 2,
            travelers: 1,
            travel_date: NaiveDate::from_ymd_opt(2026, 12, 30).unwrap(),
            activity_time: ActivityTime::EarlyBird,
        }
    }

    fn plan() -> TravelPlan {
        TravelPlan {
            personality_title: "<em>Lost</em> in Translation".to_string(),
            personality_description: "Neon and jet lag.".to_string(),
            vibe_score: 77.0,
            total_estimated_budget: 180000.0,
            currency: Some("JPY".to_string()),
            itinerary: vec![DayItinerary {
                day: 1,
                places: vec![Place {
                    name: "Park Hyatt Tokyo".to_string(),
                    address: "3-7-1-2 Nishishinjuku, Shinjuku City, Tokyo".to_string(),
                    description: "New York Bar".to_string(),
                    docent_script: "Fade in on the bar.".to_string(),
                    lat: 35.6856,
                    lng: 139.6906,
                    image_keyword: "bar".to_string(),
                    estimated_cost: None,
                    best_time: None,
                    outfit_tip: None,
                    photo_spot_tip: None,
                }],
            }],
            local_etiquette: vec![],
            soundtrack: vec![],
            movies: vec![],
        }
    }

    #[test]
    fn test_dates_cross_year_boundary() {
        let dates = TripDates::from_start(NaiveDate::from_ymd_opt(2026, 12, 30).unwrap(), 3);
        assert_eq!(dates.end_date, NaiveDate::from_ymd_opt(2027, 1, 2).unwrap());
    }

    #[test]
    fn test_new_trip_from_plan() {
        let trip = NewTrip::from_plan("user-1", &profile("Tokyo, Japan"), &plan()).unwrap();

        assert_eq!(trip.city, "Tokyo, Japan");
        assert_eq!(trip.synopsis, "Lost in Translation\n\nNeon and jet lag.");
        assert_eq!(trip.dates.end_date, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
        assert_eq!(trip.itinerary.len(), 1);
        assert!(trip.hotel_info.is_none());
        assert_eq!(trip.content.as_ref().unwrap().plan, plan());
    }

    #[test]
    fn test_new_trip_rejects_empty_city() {
        let err = NewTrip::from_plan("user-1", &profile("<p></p>"), &plan()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_without_content_omits_column() {
        let trip = NewTrip::from_plan("user-1", &profile("Tokyo"), &plan())
            .unwrap()
            .with_hotel_info(json!({ "name": "Park Hyatt" }))
            .without_content();

        let value = serde_json::to_value(&trip).unwrap();
        assert!(value.get("content").is_none());
        assert_eq!(value["hotel_info"]["name"], "Park Hyatt");
        assert_eq!(value["dates"]["start_date"], "2026-12-30");
    }

    #[test]
    fn test_saved_trip_round_trip_and_ownership() {
        let new_trip = NewTrip::from_plan("user-1", &profile("Tokyo"), &plan()).unwrap();
        let created_at = DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let saved = SavedTrip::from_new("trip-42", new_trip, created_at);

        assert!(saved.is_owned_by("user-1"));
        assert!(!saved.is_owned_by("user-2"));

        let encoded = serde_json::to_string(&saved).unwrap();
        let decoded: SavedTrip = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, saved);
        assert_eq!(decoded.content().unwrap().profile.destination, "Tokyo");
    }
}
