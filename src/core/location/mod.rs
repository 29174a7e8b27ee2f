//! Base-camp recommendation: where to stay given a plan's geocoded stops.

pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::plan::{Place, TravelPlan};

pub use rules::{classify_place, extract_area, AreaMatch, AreaRule, DEFAULT_AREA};

const CITY_FROM_LAST_SEGMENT_MAX_CHARS: usize = 20;
const CITY_FROM_FIRST_SEGMENT_MAX_CHARS: usize = 30;

/// How the recommended area was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationBasis {
    /// Most stops share the area, and it differs from the centroid anchor's
    Clustered,
    /// The area of the stop nearest to the centroid
    Centroid,
    /// No stops to work with
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecommendation {
    pub area: String,
    pub city: String,
    pub reason: String,
    pub basis: RecommendationBasis,
}

impl LocationRecommendation {
    /// Free-text lodging search query, "city area".
    pub fn search_term(&self) -> String {
        if self.city.is_empty() || self.city == DEFAULT_AREA || self.city == self.area {
            self.area.clone()
        } else {
            format!("{} {}", self.city, self.area)
        }
    }
}

/// Deterministic lodging-area heuristic. Never fails and does no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationRecommender;

impl LocationRecommender {
    pub fn new() -> Self {
        Self
    }

    pub fn recommend(&self, plan: &TravelPlan, destination: &str) -> LocationRecommendation {
        let places: Vec<&Place> = plan.places().collect();

        if places.is_empty() {
            warn!(
                target: "cinetrip::location",
                destination,
                "plan has no places; falling back to the default area"
            );
            let city = city_from_destination(destination).unwrap_or(DEFAULT_AREA);
            return LocationRecommendation {
                area: DEFAULT_AREA.to_string(),
                city: city.to_string(),
                reason: "Insufficient itinerary data; staying downtown keeps options open.".to_string(),
                basis: RecommendationBasis::Fallback,
            };
        }

        let labels: Vec<String> = places
            .iter()
            .map(|place| extract_area(&place.name, &place.address))
            .collect();
        let anchor_index = anchor_index(&places);
        let anchor = places[anchor_index];
        let closest_area = labels[anchor_index].clone();

        let (area, basis) = match most_common_area(&labels) {
            Some(area) if area != closest_area => (area, RecommendationBasis::Clustered),
            Some(area) => (area, RecommendationBasis::Centroid),
            None => (closest_area, RecommendationBasis::Centroid),
        };

        let reason = match basis {
            RecommendationBasis::Clustered => format!(
                "Multiple itinerary stops cluster around \"{area}\", so staying there minimizes transit time."
            ),
            _ => format!(
                "\"{area}\" is positioned at the center of all stops, near \"{}\", with good transit access and lodging density.",
                anchor.name
            ),
        };

        let city = resolve_city(destination, &anchor.address);

        debug!(
            target: "cinetrip::location",
            area = %area,
            city = %city,
            basis = ?basis,
            anchor = %anchor.name,
            "recommended base camp"
        );

        LocationRecommendation {
            area,
            city,
            reason,
            basis,
        }
    }
}

/// Index of the place closest to the centroid; the first one wins ties.
fn anchor_index(places: &[&Place]) -> usize {
    let count = places.len() as f64;
    let center_lat = places.iter().map(|place| place.lat).sum::<f64>() / count;
    let center_lng = places.iter().map(|place| place.lng).sum::<f64>() / count;

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, place) in places.iter().enumerate() {
        let distance = (place.lat - center_lat).hypot(place.lng - center_lng);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Most frequent non-default label, first seen wins ties.
fn most_common_area(labels: &[String]) -> Option<String> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match tally.iter_mut().find(|(area, _)| *area == label.as_str()) {
            Some((_, count)) => *count += 1,
            None => tally.push((label.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (area, count) in tally {
        if area == DEFAULT_AREA {
            continue;
        }
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((area, count));
        }
    }
    best.map(|(area, _)| area.to_string())
}

fn city_from_destination(destination: &str) -> Option<&str> {
    destination
        .split(',')
        .next()
        .map(str::trim)
        .filter(|city| !city.is_empty())
}

fn resolve_city(destination: &str, anchor_address: &str) -> String {
    if let Some(city) = city_from_destination(destination) {
        return city.to_string();
    }

    let segments: Vec<&str> = anchor_address
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    if let Some(last) = segments.last() {
        if last.chars().count() < CITY_FROM_LAST_SEGMENT_MAX_CHARS && !rules::is_street_level(last)
        {
            return last.to_string();
        }
    }
    if let Some(first) = segments.first() {
        let starts_with_digit = first.chars().next().is_some_and(|c| c.is_ascii_digit());
        if first.chars().count() < CITY_FROM_FIRST_SEGMENT_MAX_CHARS
            && !starts_with_digit
            && !rules::is_street_level(first)
        {
            return first.to_string();
        }
    }
    DEFAULT_AREA.to_string()
}
