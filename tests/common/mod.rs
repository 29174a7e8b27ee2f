#![allow(dead_code)]

use chrono::NaiveDate;
use cine_trip_rs::{
    ActivityTime, DayItinerary, Gender, Place, TravelPlan, TravelStyle, UserProfile,
};
use serde_json::{json, Value};

pub fn profile(destination: &str, duration: u32) -> UserProfile {
    UserProfile {
        age: 27,
        gender: Gender::Female,
        nationality: "Korean".to_string(),
        hobbies: vec!["indie film".to_string(), "coffee".to_string()],
        travel_style: TravelStyle::Balanced,
        destination: destination.to_string(),
        duration,
        travelers: 2,
        travel_date: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
        activity_time: ActivityTime::NightOwl,
    }
}

pub fn place(name: &str, address: &str, lat: f64, lng: f64) -> Place {
    Place {
        name: name.to_string(),
        address: address.to_string(),
        description: format!("Scene at {name}"),
        docent_script: "The camera pans slowly.".to_string(),
        lat,
        lng,
        image_keyword: "landmark".to_string(),
        estimated_cost: None,
        best_time: None,
        outfit_tip: None,
        photo_spot_tip: None,
    }
}

pub fn plan_with_days(days: Vec<Vec<Place>>) -> TravelPlan {
    TravelPlan {
        personality_title: "Neon Reverie".to_string(),
        personality_description: "A city that never cuts to black.".to_string(),
        vibe_score: 87.0,
        total_estimated_budget: 1_250_000.0,
        currency: Some("KRW".to_string()),
        itinerary: days
            .into_iter()
            .enumerate()
            .map(|(index, places)| DayItinerary {
                day: index as u32 + 1,
                places,
            })
            .collect(),
        local_etiquette: vec!["Pour drinks for elders with two hands.".to_string()],
        soundtrack: Vec::new(),
        movies: Vec::new(),
    }
}

/// A schema-complete plan payload as a backend would return it.
pub fn plan_json(days: u32) -> Value {
    let itinerary: Vec<Value> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "places": [{
                    "name": "Gyeongbokgung Palace",
                    "address": "161 Sajik-ro, Jongno-gu, Seoul",
                    "description": "Opening credits over the throne hall.",
                    "docentScript": "Six centuries watch from the eaves.",
                    "lat": 37.5796,
                    "lng": 126.9770,
                    "imageKeyword": "landmark",
                    "estimatedCost": 3000,
                    "bestTime": "morning"
                }]
            })
        })
        .collect();

    json!({
        "personalityTitle": "Neon Reverie",
        "personalityDescription": "A city that never cuts to black.",
        "vibeScore": 92,
        "totalEstimatedBudget": 1250000,
        "currency": "KRW",
        "itinerary": itinerary,
        "localEtiquette": ["Pour drinks for elders with two hands."],
        "soundtrack": [
            { "title": "Blueming", "artist": "IU", "reason": "Bright evening walks." }
        ],
        "movies": [
            { "title": "Parasite", "director": "Bong Joon-ho", "year": "2019", "reason": "Filmed around Seoul's Ahyeon-dong stairs." }
        ]
    })
}
