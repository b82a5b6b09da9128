use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// WGS84 coordinate pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Raw point of interest as returned by the Overpass interpreter
///
/// Ways and relations come back without node coordinates, so `lat`/`lon`
/// are optional; the POI service drops coordinate-less elements before
/// classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPoi {
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl RawPoi {
    /// Coordinate of the element, if it carries one
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lng)) => Some(Coordinate { lat, lng }),
            _ => None,
        }
    }
}

/// Closed amenity taxonomy assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmenityCategory {
    Transit,
    Bikeway,
    Food,
    Shopping,
    Education,
    Parks,
    Health,
    Other,
}

/// Classified point of interest with its distance from the analyzed site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amenity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: AmenityCategory,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "distance")]
    pub distance_meters: u32,
}

/// Accessibility and density scores for a site
///
/// All scores except `density` are bounded to 0..=100; `density` is derived
/// from the suggested unit count and can exceed 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreSet {
    pub walkability: u32,
    pub bikeability: u32,
    pub transit: u32,
    pub density: u32,
    pub sustainability: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingType {
    #[serde(rename = "residential")]
    Residential,
    #[serde(rename = "mixed-use")]
    MixedUse,
    #[serde(rename = "commercial")]
    Commercial,
}

impl std::fmt::Display for BuildingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Residential => "residential",
            Self::MixedUse => "mixed-use",
            Self::Commercial => "commercial",
        };
        f.write_str(label)
    }
}

/// Building configuration entered in the scenario planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingCharacteristics {
    pub floors: u32,
    #[serde(rename = "totalSqFt")]
    pub total_sq_ft: u32,
    pub units: u32,
    #[serde(rename = "parkingSpaces")]
    pub parking_spaces: u32,
    #[serde(rename = "buildingType")]
    pub building_type: BuildingType,
    #[serde(rename = "affordableHousingPercent", default)]
    pub affordable_housing_percent: u32,
}

/// Derived building metrics for display alongside the impact figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingMetrics {
    #[serde(rename = "avgUnitSize")]
    pub avg_unit_size: u32,
    #[serde(rename = "floorArea")]
    pub floor_area: u32,
    #[serde(rename = "parkingRatio")]
    pub parking_ratio: f64,
    pub density: u32,
    pub far: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TdmCategory {
    Infrastructure,
    Pricing,
    Programs,
    Policy,
}

/// Transportation demand management program from the static catalog
///
/// The catalog is immutable reference data; a scenario selects programs by
/// id rather than toggling state on shared entries.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TdmProgram {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "vmtReduction")]
    pub vmt_reduction_percent: f64,
    pub category: TdmCategory,
}

/// Inputs to the VMT model for one development scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentScenario {
    pub units: u32,
    #[serde(rename = "buildingType")]
    pub building_type: BuildingType,
    #[serde(rename = "walkabilityScore")]
    pub walkability_score: u32,
    #[serde(rename = "bikeabilityScore")]
    pub bikeability_score: u32,
    #[serde(rename = "transitScore")]
    pub transit_score: u32,
    #[serde(rename = "parkingSpaces", default)]
    pub parking_spaces: Option<u32>,
}

/// Unadjusted comparison figures at the same population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmtBaseline {
    #[serde(rename = "dailyVMTPerCapita")]
    pub daily_vmt_per_capita: f64,
    #[serde(rename = "dailyVMTTotal")]
    pub daily_vmt_total: f64,
    #[serde(rename = "annualVMTTotal")]
    pub annual_vmt_total: f64,
}

/// Vehicle miles traveled projection for a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmtResult {
    #[serde(rename = "dailyVMTPerCapita")]
    pub daily_vmt_per_capita: f64,
    #[serde(rename = "dailyVMTTotal")]
    pub daily_vmt_total: f64,
    #[serde(rename = "annualVMTTotal")]
    pub annual_vmt_total: f64,
    #[serde(rename = "vmtReduction")]
    pub vmt_reduction_percent: f64,
    pub baseline: VmtBaseline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhgBaseline {
    #[serde(rename = "dailyGHG")]
    pub daily_ghg_kg: f64,
    #[serde(rename = "annualGHG")]
    pub annual_ghg_tons: f64,
}

/// Tangible framings of the annual emissions saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhgEquivalents {
    #[serde(rename = "carsOffRoad")]
    pub cars_off_road: f64,
    #[serde(rename = "treesPlanted")]
    pub trees_planted: u32,
}

/// Greenhouse gas emissions derived from a VMT projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhgResult {
    #[serde(rename = "dailyGHG")]
    pub daily_ghg_kg: f64,
    #[serde(rename = "annualGHG")]
    pub annual_ghg_tons: f64,
    #[serde(rename = "ghgReduction")]
    pub ghg_reduction_percent: f64,
    pub baseline: GhgBaseline,
    pub equivalents: GhgEquivalents,
}

/// Categorical rating derived from the VMT reduction percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SustainabilityRating {
    #[serde(rename = "Excellent - Climate Leader")]
    Excellent,
    #[serde(rename = "Very Good - Low Carbon")]
    VeryGood,
    #[serde(rename = "Good - Below Average")]
    Good,
    #[serde(rename = "Fair - Slight Reduction")]
    Fair,
    #[serde(rename = "Baseline - No Reduction")]
    Baseline,
}

impl SustainabilityRating {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - Climate Leader",
            Self::VeryGood => "Very Good - Low Carbon",
            Self::Good => "Good - Below Average",
            Self::Fair => "Fair - Slight Reduction",
            Self::Baseline => "Baseline - No Reduction",
        }
    }
}

/// Headline numbers summarizing a scenario's impact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub population: f64,
    #[serde(rename = "annualVMTSaved")]
    pub annual_vmt_saved: f64,
    #[serde(rename = "annualGHGSaved")]
    pub annual_ghg_saved: f64,
    #[serde(rename = "sustainabilityRating")]
    pub sustainability_rating: SustainabilityRating,
}

/// VMT and GHG projection before any TDM programs are applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentImpact {
    pub vmt: VmtResult,
    pub ghg: GhgResult,
    pub summary: ImpactSummary,
}

/// Outcome of applying a TDM program portfolio to a base annual VMT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdmAdjustment {
    #[serde(rename = "adjustedVMT")]
    pub adjusted_vmt: f64,
    #[serde(rename = "totalReduction")]
    pub total_reduction_percent: f64,
    #[serde(rename = "programReduction")]
    pub program_reduction_percent: f64,
    #[serde(rename = "siteContextBonus")]
    pub site_context_bonus_percent: f64,
}

/// Full scenario evaluation: base impact with TDM programs folded in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioImpact {
    pub vmt: VmtResult,
    pub ghg: GhgResult,
    pub tdm: TdmAdjustment,
    pub building: BuildingMetrics,
    pub summary: ImpactSummary,
}

/// Density recommendation, AI-generated or deterministic fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "suggestedUnits")]
    pub suggested_units: u32,
    #[serde(rename = "recommendedHeight")]
    pub recommended_height: u32,
    pub reasoning: Vec<String>,
    pub summary: String,
}

/// Geocoder output for a resolved street address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub city: String,
}

/// Geospatial bounding box used to pre-filter POIs cheaply
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}
