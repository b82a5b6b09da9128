// Core engine exports
pub mod analyzer;
pub mod classifier;
pub mod geodesy;
pub mod impact;
pub mod recommend;
pub mod scoring;
pub mod tdm;

pub use analyzer::SiteAnalyzer;
pub use classifier::classify;
pub use geodesy::{bounding_box, distance_meters, within_bounding_box};
pub use impact::{calculate_ghg, calculate_vmt, development_impact, sustainability_rating, ImpactError};
pub use recommend::fallback_recommendation;
pub use scoring::{
    bikeability_score, density_score, sustainability_score, transit_score, walkability_score,
    ScoringConfig,
};
pub use tdm::{apply_tdm, building_metrics, catalog, resolve_programs, tdm_recommendations};
