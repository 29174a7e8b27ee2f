//! Offline base-camp recommendation for a hand-written Kyoto itinerary.

use cine_trip_rs::{classify_place, DayItinerary, LocationRecommender, Place, TravelPlan};

fn place(name: &str, address: &str, lat: f64, lng: f64) -> Place {
    Place {
        name: name.to_string(),
        address: address.to_string(),
        description: String::new(),
        docent_script: String::new(),
        lat,
        lng,
        image_keyword: "landmark".to_string(),
        estimated_cost: None,
        best_time: None,
        outfit_tip: None,
        photo_spot_tip: None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::try_init().ok();

    let plan = TravelPlan {
        personality_title: "Lanterns After Rain".to_string(),
        personality_description: "A two-day slow film in the old capital.".to_string(),
        vibe_score: 88.0,
        total_estimated_budget: 180000.0,
        currency: Some("JPY".to_string()),
        itinerary: vec![
            DayItinerary {
                day: 1,
                places: vec![
                    place("Kyoto Station Building", "Higashishiokojicho, Shimogyo Ward, Kyoto", 34.9858, 135.7588),
                    place("Yasaka Shrine", "625 Gionmachi Kitagawa, Higashiyama Ward, Kyoto", 35.0037, 135.7785),
                    place("Hanamikoji Street", "Gion Geisha District, Higashiyama Ward, Kyoto", 35.0025, 135.7750),
                ],
            },
            DayItinerary {
                day: 2,
                places: vec![
                    place("Kennin-ji", "Gion Geisha District, Higashiyama Ward, Kyoto", 35.0007, 135.7733),
                    place("Nishiki Market", "Nakagyo Ward, Kyoto", 35.0050, 135.7647),
                ],
            },
        ],
        local_etiquette: vec!["Do not photograph geiko without consent.".to_string()],
        soundtrack: Vec::new(),
        movies: Vec::new(),
    };

    println!("=== Area labels ===");
    for place in plan.places() {
        let matched = classify_place(&place.name, &place.address);
        println!("  {:<24} {:?} -> {}", place.name, matched.rule, matched.area);
    }

    let recommendation = LocationRecommender::new().recommend(&plan, "Kyoto, Japan");
    println!("\n=== Recommendation ===");
    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    println!("Search for: {}", recommendation.search_term());

    Ok(())
}
