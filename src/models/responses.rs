use serde::{Deserialize, Serialize};

use crate::models::{Amenity, ScenarioImpact, ScoreSet};

/// Response for the amenities endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmenitiesResponse {
    pub amenities: Vec<Amenity>,
    pub count: usize,
}

/// Response for the analyze endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub scores: ScoreSet,
    pub recommendation: String,
    #[serde(rename = "suggestedUnits")]
    pub suggested_units: u32,
    #[serde(rename = "recommendedHeight")]
    pub recommended_height: u32,
    pub reasoning: Vec<String>,
}

/// Response for the scenario endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResponse {
    pub impact: ScenarioImpact,
    pub recommendations: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
