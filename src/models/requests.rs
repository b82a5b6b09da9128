use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Amenity, BuildingCharacteristics};

/// Query for the geocode endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeQuery {
    pub address: String,
}

/// Query for the amenities endpoint
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct AmenitiesQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// Request to analyze a site from an already-classified amenity list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
}

/// Accessibility scores carried into a scenario evaluation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct ScenarioScores {
    #[validate(range(max = 100))]
    pub walkability: u32,
    #[validate(range(max = 100))]
    pub bikeability: u32,
    #[validate(range(max = 100))]
    pub transit: u32,
}

/// Request to evaluate a building scenario with selected TDM programs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScenarioRequest {
    pub building: BuildingCharacteristics,
    #[serde(rename = "selectedPrograms", default)]
    pub selected_programs: Vec<String>,
    #[validate(nested)]
    pub scores: ScenarioScores,
}
