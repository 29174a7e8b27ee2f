use chrono::{Days, Local};
use cine_trip_rs::{
    retry_with_backoff, ActivityTime, Gender, LocationRecommender, NewTrip, PlanRequestClient,
    RetryPolicy, TravelStyle, UserProfile,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::try_init().ok();

    // GEMINI_API_KEY, or CINETRIP_PROVIDER=openrouter with OPENAI_API_KEY
    let client = PlanRequestClient::from_env()?.with_narrative_language(
        std::env::var("CINETRIP_LANGUAGE").unwrap_or_else(|_| "English".to_string()),
    );

    let start = Local::now()
        .date_naive()
        .checked_add_days(Days::new(30))
        .unwrap_or_else(|| Local::now().date_naive());

    let profile = UserProfile {
        age: 34,
        gender: Gender::Female,
        nationality: "Canadian".to_string(),
        hobbies: vec![
            "film photography".to_string(),
            "jazz bars".to_string(),
            "street food".to_string(),
        ],
        travel_style: TravelStyle::Balanced,
        destination: "Seoul, South Korea".to_string(),
        duration: 3,
        travelers: 2,
        travel_date: start,
        activity_time: ActivityTime::NightOwl,
    }
    .clamped();

    println!("=== CineTrip Planner ({}) ===\n", client.backend_name());

    let policy = RetryPolicy::default().with_max_attempts(3);
    let plan = retry_with_backoff(&policy, || client.generate(&profile)).await?;

    println!("{}\n{}\n", plan.personality_title, plan.personality_description);
    for day in &plan.itinerary {
        println!("Day {}", day.day);
        for place in &day.places {
            match place.estimated_cost {
                Some(cost) => println!("  - {} (~{:.0})", place.name, cost),
                None => println!("  - {}", place.name),
            }
        }
    }

    let base = LocationRecommender::new().recommend(&plan, &profile.destination);
    println!("\nStay around: {}", base.search_term());
    println!("  {}", base.reason);

    let trip = NewTrip::from_plan("demo-user", &profile, &plan)?;
    println!(
        "\nTrip record: {} from {} to {}",
        trip.city, trip.dates.start_date, trip.dates.end_date
    );
    println!("\nStructured JSON:\n{}", serde_json::to_string_pretty(&trip)?);

    Ok(())
}
