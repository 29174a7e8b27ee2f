pub mod plan;
pub mod profile;
pub mod response;
pub mod trip;

pub use plan::{DayItinerary, Movie, Place, Song, TravelPlan};
pub use profile::{ActivityTime, Gender, TravelStyle, UserProfile};
pub use response::deserialize_structured_response;
pub use trip::{NewTrip, SavedTrip, TripContent, TripDates};
