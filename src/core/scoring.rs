use std::collections::HashSet;

use crate::models::{Amenity, AmenityCategory};

/// Amenities within biking range count toward bikeability access
pub const BIKEABLE_RANGE_METERS: u32 = 2000;
/// Transit stops closer than this earn the full proximity weight
const TRANSIT_CLOSE_METERS: u32 = 400;
/// Transit stops between close and this earn the reduced weight
const TRANSIT_MEDIUM_METERS: u32 = 800;

/// Scoring configuration
///
/// `tracked_categories` is the diversity divisor shared by the walkability
/// and bikeability formulas. It must match the number of scoreable
/// categories the classifier emits (7 with bikeway tracked as its own
/// category); keeping it in one place keeps the two formulas in sync.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub tracked_categories: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tracked_categories: 7,
        }
    }
}

/// Walkability score (0-100)
///
/// Scoring formula:
/// score = count_score (max 50, saturating at 20 amenities)
///       + diversity_score (max 50, saturating at full category coverage)
pub fn walkability_score(amenities: &[Amenity], config: &ScoringConfig) -> u32 {
    let total_count = amenities.len() as f64;
    let categories: HashSet<AmenityCategory> = amenities.iter().map(|a| a.category).collect();

    let count_score = f64::min(50.0, total_count / 20.0 * 50.0);
    let diversity_score = f64::min(
        50.0,
        categories.len() as f64 / config.tracked_categories as f64 * 50.0,
    );

    (count_score + diversity_score).round() as u32
}

/// Bikeability score (0-100)
///
/// Combines dedicated bike infrastructure (max 40, saturating at 10
/// bikeway amenities) with the variety of destinations reachable within
/// biking range (max 60).
pub fn bikeability_score(amenities: &[Amenity], config: &ScoringConfig) -> u32 {
    let bike_infra_count = amenities
        .iter()
        .filter(|a| a.category == AmenityCategory::Bikeway)
        .count() as f64;
    let infra_score = f64::min(40.0, bike_infra_count / 10.0 * 40.0);

    let bikeable_categories: HashSet<AmenityCategory> = amenities
        .iter()
        .filter(|a| a.distance_meters < BIKEABLE_RANGE_METERS)
        .map(|a| a.category)
        .collect();
    let access_score = f64::min(
        60.0,
        bikeable_categories.len() as f64 / config.tracked_categories as f64 * 60.0,
    );

    (infra_score + access_score).round() as u32
}

/// Transit score (0-100)
///
/// Close stops (<400m) weigh 15 points each, medium stops (400-800m)
/// 10 points, plus a quantity score capped at 30. No transit amenities
/// at all is an explicit zero, not a degenerate formula result.
pub fn transit_score(amenities: &[Amenity]) -> u32 {
    // Legacy feeds tag stops by type rather than category; accept both.
    let transit: Vec<&Amenity> = amenities
        .iter()
        .filter(|a| {
            a.category == AmenityCategory::Transit || a.kind == "bus_stop" || a.kind == "light_rail"
        })
        .collect();

    if transit.is_empty() {
        return 0;
    }

    let close_count = transit
        .iter()
        .filter(|a| a.distance_meters < TRANSIT_CLOSE_METERS)
        .count() as f64;
    let medium_count = transit
        .iter()
        .filter(|a| {
            a.distance_meters >= TRANSIT_CLOSE_METERS && a.distance_meters < TRANSIT_MEDIUM_METERS
        })
        .count() as f64;

    let proximity_score = close_count * 15.0 + medium_count * 10.0;
    let quantity_score = f64::min(30.0, transit.len() as f64 * 5.0);

    u32::min(100, (proximity_score + quantity_score).round() as u32)
}

/// Sustainability score: mean of the three accessibility scores
pub fn sustainability_score(walkability: u32, bikeability: u32, transit: u32) -> u32 {
    ((walkability + bikeability + transit) as f64 / 3.0).round() as u32
}

/// Density score derived from the suggested unit count (100 at 50 units)
pub fn density_score(suggested_units: u32) -> u32 {
    (suggested_units as f64 / 50.0 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amenity(id: i64, category: AmenityCategory, kind: &str, distance_meters: u32) -> Amenity {
        Amenity {
            id: id.to_string(),
            name: kind.replace('_', " "),
            kind: kind.to_string(),
            category,
            lat: 38.58,
            lng: -121.49,
            distance_meters,
        }
    }

    fn mixed_neighborhood() -> Vec<Amenity> {
        vec![
            amenity(1, AmenityCategory::Transit, "bus_stop", 250),
            amenity(2, AmenityCategory::Transit, "bus_stop", 600),
            amenity(3, AmenityCategory::Food, "restaurant", 300),
            amenity(4, AmenityCategory::Food, "cafe", 450),
            amenity(5, AmenityCategory::Shopping, "supermarket", 700),
            amenity(6, AmenityCategory::Parks, "park", 900),
            amenity(7, AmenityCategory::Bikeway, "bike_lane", 150),
            amenity(8, AmenityCategory::Health, "pharmacy", 1200),
        ]
    }

    #[test]
    fn test_walkability_empty_is_zero() {
        assert_eq!(walkability_score(&[], &ScoringConfig::default()), 0);
    }

    #[test]
    fn test_walkability_saturates_at_100() {
        let config = ScoringConfig::default();
        let mut amenities = Vec::new();
        let categories = [
            AmenityCategory::Transit,
            AmenityCategory::Bikeway,
            AmenityCategory::Food,
            AmenityCategory::Shopping,
            AmenityCategory::Education,
            AmenityCategory::Parks,
            AmenityCategory::Health,
        ];
        for i in 0..28 {
            amenities.push(amenity(i, categories[i as usize % 7], "x", 500));
        }

        assert_eq!(walkability_score(&amenities, &config), 100);
    }

    #[test]
    fn test_walkability_partial() {
        let config = ScoringConfig::default();
        let amenities = mixed_neighborhood();

        // 8 amenities -> count 20.0; 6 categories -> diversity 42.857
        assert_eq!(walkability_score(&amenities, &config), 63);
    }

    #[test]
    fn test_walkability_respects_configured_divisor() {
        let amenities = mixed_neighborhood();
        let six = walkability_score(&amenities, &ScoringConfig { tracked_categories: 6 });
        let seven = walkability_score(&amenities, &ScoringConfig { tracked_categories: 7 });

        assert!(six > seven, "smaller divisor should score diversity higher");
    }

    #[test]
    fn test_bikeability_counts_infrastructure_and_range() {
        let config = ScoringConfig::default();
        let amenities = vec![
            amenity(1, AmenityCategory::Bikeway, "bike_lane", 100),
            amenity(2, AmenityCategory::Bikeway, "bicycle_parking", 300),
            amenity(3, AmenityCategory::Food, "cafe", 1500),
            amenity(4, AmenityCategory::Shopping, "supermarket", 2500),
        ];

        // infra: 2/10*40 = 8; bikeable (<2000m) categories {bikeway, food}: 2/7*60 = 17.14
        assert_eq!(bikeability_score(&amenities, &config), 25);
    }

    #[test]
    fn test_bikeability_empty_is_zero() {
        assert_eq!(bikeability_score(&[], &ScoringConfig::default()), 0);
    }

    #[test]
    fn test_transit_zero_without_transit_amenities() {
        let amenities = vec![
            amenity(1, AmenityCategory::Food, "restaurant", 100),
            amenity(2, AmenityCategory::Parks, "park", 200),
        ];

        assert_eq!(transit_score(&amenities), 0);
    }

    #[test]
    fn test_transit_empty_is_zero() {
        assert_eq!(transit_score(&[]), 0);
    }

    #[test]
    fn test_transit_proximity_weighting() {
        let amenities = vec![
            amenity(1, AmenityCategory::Transit, "bus_stop", 200),
            amenity(2, AmenityCategory::Transit, "bus_stop", 350),
            amenity(3, AmenityCategory::Transit, "bus_stop", 390),
            amenity(4, AmenityCategory::Transit, "light_rail", 500),
        ];

        // close 3*15 + medium 1*10 + quantity min(30, 4*5) = 75
        assert_eq!(transit_score(&amenities), 75);
    }

    #[test]
    fn test_transit_caps_at_100() {
        let amenities: Vec<Amenity> = (0..12)
            .map(|i| amenity(i, AmenityCategory::Transit, "bus_stop", 100))
            .collect();

        assert_eq!(transit_score(&amenities), 100);
    }

    #[test]
    fn test_transit_accepts_legacy_types() {
        // Mis-categorized stop still counts via its type
        let amenities = vec![amenity(1, AmenityCategory::Other, "bus_stop", 300)];

        assert_eq!(transit_score(&amenities), 20);
    }

    #[test]
    fn test_scores_bounded_for_any_input() {
        let config = ScoringConfig::default();
        let amenities: Vec<Amenity> = (0..500)
            .map(|i| amenity(i, AmenityCategory::Transit, "bus_stop", (i as u32) * 10))
            .collect();

        assert!(walkability_score(&amenities, &config) <= 100);
        assert!(bikeability_score(&amenities, &config) <= 100);
        assert!(transit_score(&amenities) <= 100);
    }

    #[test]
    fn test_sustainability_is_rounded_mean() {
        assert_eq!(sustainability_score(70, 50, 60), 60);
        assert_eq!(sustainability_score(0, 0, 0), 0);
        assert_eq!(sustainability_score(100, 100, 100), 100);
        assert_eq!(sustainability_score(50, 50, 51), 50);
    }

    #[test]
    fn test_density_score() {
        assert_eq!(density_score(50), 100);
        assert_eq!(density_score(24), 48);
        assert_eq!(density_score(75), 150);
    }
}
