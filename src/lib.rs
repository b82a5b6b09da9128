//! Sitescore - site analysis scoring and development impact service
//!
//! This library turns nearby points of interest into walkability,
//! bikeability and transit scores, projects vehicle miles traveled and
//! greenhouse gas emissions for building scenarios, and applies
//! transportation demand management programs on top.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance_meters, fallback_recommendation, ScoringConfig, SiteAnalyzer};
pub use crate::models::{
    Amenity, AmenityCategory, BuildingCharacteristics, Coordinate, DevelopmentScenario, RawPoi,
    ScenarioImpact, ScoreSet, TdmProgram, VmtResult,
};
