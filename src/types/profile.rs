use crate::services::sanitize::{validate_string_array, validate_text_input};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 7;
pub const MIN_TRAVELERS: u32 = 1;
pub const MAX_TRAVELERS: u32 = 10;
pub const MAX_AGE: u8 = 100;

const MAX_TEXT_LEN: usize = 200;
const MAX_HOBBIES: usize = 20;

/// Travel-preference form submitted by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u8,
    pub gender: Gender,
    pub nationality: String,
    pub hobbies: Vec<String>,
    pub travel_style: TravelStyle,
    pub destination: String,
    /// Trip length in days
    pub duration: u32,
    pub travelers: u32,
    pub travel_date: NaiveDate,
    pub activity_time: ActivityTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Budget,
    Luxury,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityTime {
    EarlyBird,
    NightOwl,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non-binary",
            Gender::Other => "other",
        }
    }
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "budget",
            TravelStyle::Luxury => "luxury",
            TravelStyle::Balanced => "balanced",
        }
    }
}

impl ActivityTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityTime::EarlyBird => "early-bird",
            ActivityTime::NightOwl => "night-owl",
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $label:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = value.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|candidate: &$ty| candidate.as_str() == wanted)
                    .ok_or_else(|| format!("unknown {} `{}`", $label, value))
            }
        }
    };
}

text_enum!(Gender, "gender", [Gender::Male, Gender::Female, Gender::NonBinary, Gender::Other]);
text_enum!(TravelStyle, "travel style", [TravelStyle::Budget, TravelStyle::Luxury, TravelStyle::Balanced]);
text_enum!(ActivityTime, "activity time", [ActivityTime::EarlyBird, ActivityTime::NightOwl]);

impl UserProfile {
    /// Bring user-editable fields into the ranges the planner is built for.
    ///
    /// Form values arrive unchecked. This clamps duration, travelers and age,
    /// strips markup from free text and drops empty or repeated hobbies.
    pub fn clamped(mut self) -> Self {
        self.age = self.age.min(MAX_AGE);
        self.duration = self.duration.clamp(MIN_DURATION_DAYS, MAX_DURATION_DAYS);
        self.travelers = self.travelers.clamp(MIN_TRAVELERS, MAX_TRAVELERS);
        self.nationality = validate_text_input(&self.nationality, MAX_TEXT_LEN);
        self.destination = validate_text_input(&self.destination, MAX_TEXT_LEN);

        let mut hobbies: Vec<String> = Vec::new();
        for hobby in validate_string_array(&self.hobbies, MAX_HOBBIES) {
            if !hobbies.contains(&hobby) {
                hobbies.push(hobby);
            }
        }
        self.hobbies = hobbies;
        self
    }
}
