use crate::core::{classifier, geodesy, impact, scoring, tdm};
use crate::core::impact::ImpactError;
use crate::core::scoring::ScoringConfig;
use crate::models::{
    Amenity, AmenityCategory, BuildingCharacteristics, Coordinate, DevelopmentScenario, GhgResult,
    ImpactSummary, RawPoi, ScenarioImpact, ScoreSet, VmtResult,
};

/// Site analysis orchestrator
///
/// # Pipeline
/// 1. Geospatial bounding-box pre-filter on raw POIs
/// 2. Priority-rule classification, dropping uncategorized entries
/// 3. Accessibility scoring over the classified list
/// 4. Scenario evaluation: base impact, TDM adjustment, recombination
#[derive(Debug, Clone)]
pub struct SiteAnalyzer {
    scoring: ScoringConfig,
}

impl SiteAnalyzer {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Classify raw POIs around a site
    ///
    /// Pre-filters to the search radius, classifies, drops `other`
    /// entries, and returns the list sorted nearest-first.
    pub fn classify_pois(
        &self,
        site: Coordinate,
        pois: &[RawPoi],
        radius_meters: f64,
    ) -> Vec<Amenity> {
        let bbox = geodesy::bounding_box(site, radius_meters);

        let mut amenities: Vec<Amenity> = pois
            .iter()
            .filter(|poi| {
                poi.coordinate()
                    .map_or(false, |c| geodesy::within_bounding_box(c, &bbox))
            })
            .filter_map(|poi| classifier::classify(poi, site))
            .filter(|amenity| amenity.category != AmenityCategory::Other)
            .collect();

        amenities.sort_by_key(|a| a.distance_meters);
        amenities
    }

    /// Score a classified amenity list
    ///
    /// `density` stays 0 here; it is filled in once a unit recommendation
    /// exists.
    pub fn score(&self, amenities: &[Amenity]) -> ScoreSet {
        let walkability = scoring::walkability_score(amenities, &self.scoring);
        let bikeability = scoring::bikeability_score(amenities, &self.scoring);
        let transit = scoring::transit_score(amenities);

        ScoreSet {
            walkability,
            bikeability,
            transit,
            density: 0,
            sustainability: scoring::sustainability_score(walkability, bikeability, transit),
        }
    }

    /// Evaluate a building scenario with a TDM program selection
    ///
    /// Computes the accessibility-driven base impact, applies the TDM
    /// portfolio to the base annual VMT, then re-derives the daily and
    /// per-capita figures and the GHG numbers from the adjusted total.
    /// The two reduction layers are computed independently and stacked
    /// additively in the reported reduction percentage.
    pub fn evaluate_scenario(
        &self,
        building: &BuildingCharacteristics,
        selected_programs: &[String],
        walkability: u32,
        bikeability: u32,
        transit: u32,
    ) -> Result<ScenarioImpact, ImpactError> {
        let scenario = DevelopmentScenario {
            units: building.units,
            building_type: building.building_type,
            walkability_score: walkability,
            bikeability_score: bikeability,
            transit_score: transit,
            parking_spaces: Some(building.parking_spaces),
        };

        let base = impact::development_impact(&scenario)?;
        let programs = tdm::resolve_programs(selected_programs);
        let adjustment = tdm::apply_tdm(
            base.vmt.annual_vmt_total,
            &programs,
            walkability,
            bikeability,
        );

        let population = building.units as f64 * impact::AVG_HOUSEHOLD_SIZE;
        let daily_total = (adjustment.adjusted_vmt / 365.0).round();
        let per_capita = impact::round1(adjustment.adjusted_vmt / 365.0 / population);
        let combined_reduction =
            base.vmt.vmt_reduction_percent + adjustment.total_reduction_percent;

        let vmt = VmtResult {
            daily_vmt_per_capita: per_capita,
            daily_vmt_total: daily_total,
            annual_vmt_total: adjustment.adjusted_vmt,
            vmt_reduction_percent: combined_reduction,
            baseline: base.vmt.baseline.clone(),
        };

        let daily_ghg = daily_total * impact::GHG_LBS_PER_MILE * impact::LBS_TO_KG;
        let annual_ghg = impact::round2(daily_ghg * 365.0 / 1000.0);
        let annual_savings = base.ghg.baseline.annual_ghg_tons - annual_ghg;

        let ghg = GhgResult {
            daily_ghg_kg: impact::round1(daily_ghg),
            annual_ghg_tons: annual_ghg,
            ghg_reduction_percent: combined_reduction,
            baseline: base.ghg.baseline.clone(),
            equivalents: impact::equivalents_for_savings(annual_savings),
        };

        let building_metrics = tdm::building_metrics(building)?;

        let summary = ImpactSummary {
            population,
            annual_vmt_saved: vmt.baseline.annual_vmt_total - vmt.annual_vmt_total,
            annual_ghg_saved: impact::round2(ghg.baseline.annual_ghg_tons - ghg.annual_ghg_tons),
            sustainability_rating: impact::sustainability_rating(combined_reduction),
        };

        Ok(ScenarioImpact {
            vmt,
            ghg,
            tdm: adjustment,
            building: building_metrics,
            summary,
        })
    }
}

impl Default for SiteAnalyzer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildingType, SustainabilityRating};
    use std::collections::HashMap;

    const SITE: Coordinate = Coordinate {
        lat: 38.5816,
        lng: -121.4944,
    };

    fn poi(id: i64, lat: f64, lng: f64, tags: &[(&str, &str)]) -> RawPoi {
        RawPoi {
            id,
            lat: Some(lat),
            lon: Some(lng),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn downtown_pois() -> Vec<RawPoi> {
        vec![
            poi(1, 38.5820, -121.4950, &[("highway", "bus_stop")]),
            poi(2, 38.5830, -121.4960, &[("railway", "station")]),
            poi(3, 38.5812, -121.4930, &[("amenity", "cafe")]),
            poi(4, 38.5800, -121.4920, &[("shop", "supermarket")]),
            poi(5, 38.5840, -121.4970, &[("leisure", "park")]),
            poi(6, 38.5825, -121.4955, &[("amenity", "bench")]),
            // Outside the 1.5km search radius
            poi(7, 38.7000, -121.6000, &[("amenity", "cafe")]),
            // No coordinates (a way)
            RawPoi {
                id: 8,
                lat: None,
                lon: None,
                tags: HashMap::from([("highway".to_string(), "cycleway".to_string())]),
            },
        ]
    }

    #[test]
    fn test_classify_pois_filters_and_sorts() {
        let analyzer = SiteAnalyzer::default();
        let amenities = analyzer.classify_pois(SITE, &downtown_pois(), 1500.0);

        // bench (other), far cafe, and the coordinate-less way are dropped
        assert_eq!(amenities.len(), 5);
        for window in amenities.windows(2) {
            assert!(window[0].distance_meters <= window[1].distance_meters);
        }
    }

    #[test]
    fn test_score_empty_amenity_list_is_all_zero() {
        let analyzer = SiteAnalyzer::default();
        let scores = analyzer.score(&[]);

        assert_eq!(scores.walkability, 0);
        assert_eq!(scores.bikeability, 0);
        assert_eq!(scores.transit, 0);
        assert_eq!(scores.sustainability, 0);
    }

    #[test]
    fn test_score_downtown_site() {
        let analyzer = SiteAnalyzer::default();
        let amenities = analyzer.classify_pois(SITE, &downtown_pois(), 1500.0);
        let scores = analyzer.score(&amenities);

        assert!(scores.walkability > 0 && scores.walkability <= 100);
        assert!(scores.transit > 0 && scores.transit <= 100);
        assert_eq!(
            scores.sustainability,
            ((scores.walkability + scores.bikeability + scores.transit) as f64 / 3.0).round()
                as u32
        );
    }

    fn test_building() -> BuildingCharacteristics {
        BuildingCharacteristics {
            floors: 3,
            total_sq_ft: 24_000,
            units: 24,
            parking_spaces: 18,
            building_type: BuildingType::Residential,
            affordable_housing_percent: 15,
        }
    }

    #[test]
    fn test_scenario_without_programs_matches_base_impact() {
        let analyzer = SiteAnalyzer::default();
        let impact = analyzer
            .evaluate_scenario(&test_building(), &[], 70, 50, 60)
            .unwrap();

        assert_eq!(impact.vmt.annual_vmt_total, 282_941.0);
        assert_eq!(impact.vmt.vmt_reduction_percent, 38.0);
        assert_eq!(impact.tdm.total_reduction_percent, 0.0);
    }

    #[test]
    fn test_scenario_stacks_tdm_on_base_reduction() {
        let analyzer = SiteAnalyzer::default();
        let selected = vec!["transit-subsidy".to_string(), "car-share".to_string()];
        let impact = analyzer
            .evaluate_scenario(&test_building(), &selected, 70, 50, 60)
            .unwrap();

        // 10.5% programs + 10.5*0.6*0.25 bonus = 12.075 -> 12.1 display
        assert_eq!(impact.tdm.program_reduction_percent, 10.5);
        assert_eq!(impact.tdm.total_reduction_percent, 12.1);
        assert!(impact.vmt.annual_vmt_total < 282_941.0);
        assert_eq!(impact.vmt.vmt_reduction_percent, 38.0 + 12.1);
        assert_eq!(
            impact.ghg.ghg_reduction_percent,
            impact.vmt.vmt_reduction_percent
        );
        assert_eq!(
            impact.summary.sustainability_rating,
            SustainabilityRating::Excellent
        );
    }

    #[test]
    fn test_scenario_daily_figures_follow_adjusted_annual() {
        let analyzer = SiteAnalyzer::default();
        let selected = vec!["reduced-parking".to_string()];
        let impact = analyzer
            .evaluate_scenario(&test_building(), &selected, 70, 50, 60)
            .unwrap();

        let expected_daily = (impact.vmt.annual_vmt_total / 365.0).round();
        assert_eq!(impact.vmt.daily_vmt_total, expected_daily);

        let expected_per_capita =
            (impact.vmt.annual_vmt_total / 365.0 / 60.0 * 10.0).round() / 10.0;
        assert_eq!(impact.vmt.daily_vmt_per_capita, expected_per_capita);
    }

    #[test]
    fn test_scenario_rejects_zero_units() {
        let analyzer = SiteAnalyzer::default();
        let mut building = test_building();
        building.units = 0;

        assert!(analyzer
            .evaluate_scenario(&building, &[], 50, 50, 50)
            .is_err());
    }
}
