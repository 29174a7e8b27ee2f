pub mod gate;
pub mod location;
pub mod planner;

pub use gate::{GatePermit, GenerationGate};
pub use location::{LocationRecommendation, LocationRecommender, RecommendationBasis};
pub use planner::{parse_plan_response, strip_code_fences, PlanRequestClient};
