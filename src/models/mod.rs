// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Amenity, AmenityCategory, BoundingBox, BuildingCharacteristics, BuildingMetrics, BuildingType,
    Coordinate, DevelopmentImpact, DevelopmentScenario, GeocodedAddress, GhgBaseline,
    GhgEquivalents, GhgResult, ImpactSummary, RawPoi, Recommendation, ScenarioImpact, ScoreSet,
    SustainabilityRating, TdmAdjustment, TdmCategory, TdmProgram, VmtBaseline, VmtResult,
};
pub use requests::{AmenitiesQuery, AnalyzeRequest, GeocodeQuery, ScenarioRequest, ScenarioScores};
pub use responses::{
    AmenitiesResponse, AnalysisResponse, ErrorResponse, HealthResponse, ScenarioResponse,
};
