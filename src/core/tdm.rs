use tracing::warn;

use crate::core::impact::{round1, round2, ImpactError};
use crate::models::{
    BuildingCharacteristics, BuildingMetrics, TdmAdjustment, TdmCategory, TdmProgram,
};

/// Combined TDM reduction never exceeds this, regardless of how many
/// programs are stacked
pub const MAX_TOTAL_REDUCTION_PERCENT: f64 = 60.0;
/// Site-context amplification tops out at 25% of the program reduction
const SITE_CONTEXT_BONUS_FACTOR: f64 = 0.25;
/// Placeholder lot size for FAR until parcel polygons are wired in, sq ft
const ESTIMATED_LOT_SQ_FT: f64 = 10_000.0;

/// Master list of transportation demand management programs
///
/// Reduction percentages follow California TDM practice and CARB
/// guidance. The list is immutable reference data; scenarios select
/// entries by id.
static CATALOG: [TdmProgram; 14] = [
    // Infrastructure
    TdmProgram {
        id: "bike-parking",
        name: "Secure Bike Parking & Lockers",
        description: "Covered, secure bike parking with showers/lockers",
        vmt_reduction_percent: 3.5,
        category: TdmCategory::Infrastructure,
    },
    TdmProgram {
        id: "bike-share",
        name: "On-Site Bike Share Station",
        description: "Subsidized bike share membership for residents",
        vmt_reduction_percent: 2.5,
        category: TdmCategory::Infrastructure,
    },
    TdmProgram {
        id: "ev-charging",
        name: "EV Charging Stations",
        description: "Level 2 EV charging for 20% of parking spaces",
        vmt_reduction_percent: 1.0,
        category: TdmCategory::Infrastructure,
    },
    TdmProgram {
        id: "car-share",
        name: "Car Share Program",
        description: "On-site car share spaces (Zipcar, Gig, etc.)",
        vmt_reduction_percent: 4.0,
        category: TdmCategory::Infrastructure,
    },
    // Pricing
    TdmProgram {
        id: "unbundled-parking",
        name: "Unbundled Parking",
        description: "Parking sold/rented separately from units",
        vmt_reduction_percent: 5.0,
        category: TdmCategory::Pricing,
    },
    TdmProgram {
        id: "transit-subsidy",
        name: "Transit Pass Subsidy",
        description: "Free or subsidized transit passes for residents",
        vmt_reduction_percent: 6.5,
        category: TdmCategory::Pricing,
    },
    TdmProgram {
        id: "parking-cashout",
        name: "Parking Cash-Out",
        description: "Cash payment option instead of parking space",
        vmt_reduction_percent: 4.5,
        category: TdmCategory::Pricing,
    },
    // Programs
    TdmProgram {
        id: "carpool-program",
        name: "Carpool/Vanpool Program",
        description: "Ridematching and preferential parking",
        vmt_reduction_percent: 3.0,
        category: TdmCategory::Programs,
    },
    TdmProgram {
        id: "telecommute",
        name: "Telecommute Support",
        description: "Encourage 1-2 days/week remote work",
        vmt_reduction_percent: 4.0,
        category: TdmCategory::Programs,
    },
    TdmProgram {
        id: "guaranteed-ride",
        name: "Guaranteed Ride Home",
        description: "Emergency rides for transit/bike commuters",
        vmt_reduction_percent: 2.0,
        category: TdmCategory::Programs,
    },
    TdmProgram {
        id: "flexible-hours",
        name: "Flexible Work Hours",
        description: "Staggered schedules to avoid peak traffic",
        vmt_reduction_percent: 2.5,
        category: TdmCategory::Programs,
    },
    // Policy
    TdmProgram {
        id: "reduced-parking",
        name: "Reduced Parking Ratio",
        description: "0.5-0.75 spaces per unit (below code minimum)",
        vmt_reduction_percent: 7.0,
        category: TdmCategory::Policy,
    },
    TdmProgram {
        id: "transit-oriented",
        name: "Transit-Oriented Design",
        description: "Ground-floor retail, pedestrian-friendly design",
        vmt_reduction_percent: 5.5,
        category: TdmCategory::Policy,
    },
    TdmProgram {
        id: "complete-streets",
        name: "Complete Streets Features",
        description: "Sidewalks, crosswalks, bike lanes in development",
        vmt_reduction_percent: 3.5,
        category: TdmCategory::Policy,
    },
];

/// The full program catalog
pub fn catalog() -> &'static [TdmProgram] {
    &CATALOG
}

/// Look up a program by id
pub fn find_program(id: &str) -> Option<&'static TdmProgram> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Resolve a set of selected program ids against the catalog
///
/// Unknown ids are skipped rather than failing the whole selection.
pub fn resolve_programs(ids: &[String]) -> Vec<&'static TdmProgram> {
    ids.iter()
        .filter_map(|id| {
            let program = find_program(id);
            if program.is_none() {
                warn!("unknown TDM program id: {}", id);
            }
            program
        })
        .collect()
}

/// Apply a TDM program portfolio to a base annual VMT
///
/// Program reductions sum directly (programs are treated as roughly
/// independent). Sites that already score well on walking and biking
/// amplify program effectiveness, up to a 25% bonus on the program
/// reduction itself. The combined reduction is capped at 60%.
pub fn apply_tdm(
    base_annual_vmt: f64,
    programs: &[&TdmProgram],
    walkability_score: u32,
    bikeability_score: u32,
) -> TdmAdjustment {
    let program_reduction: f64 = programs.iter().map(|p| p.vmt_reduction_percent).sum();

    let avg_score = (walkability_score + bikeability_score) as f64 / 200.0;
    let site_context_bonus = program_reduction * avg_score * SITE_CONTEXT_BONUS_FACTOR;

    let total_reduction = f64::min(
        MAX_TOTAL_REDUCTION_PERCENT,
        program_reduction + site_context_bonus,
    );
    let adjusted_vmt = base_annual_vmt * (1.0 - total_reduction / 100.0);

    TdmAdjustment {
        adjusted_vmt: adjusted_vmt.round(),
        total_reduction_percent: round1(total_reduction),
        program_reduction_percent: round1(program_reduction),
        site_context_bonus_percent: round1(site_context_bonus),
    }
}

/// Derive display metrics from a building configuration
pub fn building_metrics(
    building: &BuildingCharacteristics,
) -> Result<BuildingMetrics, ImpactError> {
    if building.units == 0 {
        return Err(ImpactError::InvalidScenario(
            "units must be positive".to_string(),
        ));
    }
    if building.floors == 0 {
        return Err(ImpactError::InvalidScenario(
            "floors must be positive".to_string(),
        ));
    }

    let avg_unit_size = building.total_sq_ft as f64 / building.units as f64;
    let floor_area = building.total_sq_ft as f64 / building.floors as f64;
    let parking_ratio = building.parking_spaces as f64 / building.units as f64;
    let far = building.total_sq_ft as f64 / ESTIMATED_LOT_SQ_FT;

    Ok(BuildingMetrics {
        avg_unit_size: avg_unit_size.round() as u32,
        floor_area: floor_area.round() as u32,
        parking_ratio: round2(parking_ratio),
        density: building.units,
        far: round2(far),
        description: format!(
            "{}-story {} with {} units",
            building.floors, building.building_type, building.units
        ),
    })
}

/// Threshold-based TDM program suggestions for a site's score profile
pub fn tdm_recommendations(
    walkability_score: u32,
    bikeability_score: u32,
    transit_score: u32,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if walkability_score >= 70 || bikeability_score >= 70 {
        recommendations.push("Consider reduced parking ratios (0.5-0.75 spaces/unit)".to_string());
        recommendations.push("Implement unbundled parking to reduce car ownership".to_string());
    }

    if transit_score >= 60 {
        recommendations.push("Offer subsidized transit passes to all residents".to_string());
        recommendations.push("Transit-oriented design with ground-floor retail".to_string());
    }

    if bikeability_score >= 60 {
        recommendations.push("Provide secure bike parking and repair station".to_string());
        recommendations.push("Partner with local bike share program".to_string());
    }

    if walkability_score < 50 && transit_score < 50 {
        recommendations.push("Implement robust TDM program including car share".to_string());
        recommendations.push("Provide guaranteed ride home program".to_string());
        recommendations.push("Encourage telecommute options for residents".to_string());
    }

    recommendations.push("Install EV charging infrastructure for future-proofing".to_string());

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BuildingType;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_fourteen_unique_programs() {
        let ids: HashSet<&str> = catalog().iter().map(|p| p.id).collect();

        assert_eq!(catalog().len(), 14);
        assert_eq!(ids.len(), 14);
    }

    #[test]
    fn test_catalog_reductions_are_positive() {
        for program in catalog() {
            assert!(
                program.vmt_reduction_percent > 0.0,
                "{} has a non-positive reduction",
                program.id
            );
        }
    }

    #[test]
    fn test_resolve_skips_unknown_ids() {
        let ids = vec![
            "transit-subsidy".to_string(),
            "does-not-exist".to_string(),
            "car-share".to_string(),
        ];

        let programs = resolve_programs(&ids);
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].id, "transit-subsidy");
        assert_eq!(programs[1].id, "car-share");
    }

    #[test]
    fn test_stacking_with_site_context_bonus() {
        // One 10% program at walk 80 / bike 60:
        // avg 0.7, bonus 10*0.7*0.25 = 1.75, total 11.75
        let program = TdmProgram {
            id: "test-program",
            name: "Test Program",
            description: "",
            vmt_reduction_percent: 10.0,
            category: TdmCategory::Programs,
        };

        let adjustment = apply_tdm(100_000.0, &[&program], 80, 60);

        assert_eq!(adjustment.adjusted_vmt, 88_250.0);
        assert_eq!(adjustment.program_reduction_percent, 10.0);
        assert_eq!(adjustment.site_context_bonus_percent, 1.8);
        assert_eq!(adjustment.total_reduction_percent, 11.8);
    }

    #[test]
    fn test_no_programs_is_a_noop() {
        let adjustment = apply_tdm(100_000.0, &[], 90, 90);

        assert_eq!(adjustment.adjusted_vmt, 100_000.0);
        assert_eq!(adjustment.total_reduction_percent, 0.0);
        assert_eq!(adjustment.program_reduction_percent, 0.0);
        assert_eq!(adjustment.site_context_bonus_percent, 0.0);
    }

    #[test]
    fn test_total_reduction_capped_at_60() {
        let all: Vec<&TdmProgram> = catalog().iter().collect();

        let adjustment = apply_tdm(100_000.0, &all, 100, 100);

        assert_eq!(adjustment.total_reduction_percent, 60.0);
        assert_eq!(adjustment.adjusted_vmt, 40_000.0);
        // The uncapped figure (54.5% + bonus) would have exceeded the cap
        assert!(adjustment.program_reduction_percent + adjustment.site_context_bonus_percent > 60.0);
    }

    #[test]
    fn test_zero_scores_mean_zero_bonus() {
        let program = find_program("transit-subsidy").unwrap();

        let adjustment = apply_tdm(50_000.0, &[program], 0, 0);

        assert_eq!(adjustment.site_context_bonus_percent, 0.0);
        assert_eq!(adjustment.total_reduction_percent, 6.5);
    }

    fn building(units: u32, floors: u32) -> BuildingCharacteristics {
        BuildingCharacteristics {
            floors,
            total_sq_ft: 24_000,
            units,
            parking_spaces: 18,
            building_type: BuildingType::MixedUse,
            affordable_housing_percent: 15,
        }
    }

    #[test]
    fn test_building_metrics() {
        let metrics = building_metrics(&building(24, 3)).unwrap();

        assert_eq!(metrics.avg_unit_size, 1000);
        assert_eq!(metrics.floor_area, 8000);
        assert_eq!(metrics.parking_ratio, 0.75);
        assert_eq!(metrics.density, 24);
        assert_eq!(metrics.far, 2.4);
        assert_eq!(metrics.description, "3-story mixed-use with 24 units");
    }

    #[test]
    fn test_building_metrics_rejects_zero_units_or_floors() {
        assert!(matches!(
            building_metrics(&building(0, 3)),
            Err(ImpactError::InvalidScenario(_))
        ));
        assert!(matches!(
            building_metrics(&building(24, 0)),
            Err(ImpactError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_recommendations_for_low_access_site() {
        let recommendations = tdm_recommendations(30, 20, 10);

        assert!(recommendations
            .iter()
            .any(|r| r.contains("robust TDM program")));
        // EV charging advice always appears
        assert!(recommendations.iter().any(|r| r.contains("EV charging")));
    }

    #[test]
    fn test_recommendations_for_high_access_site() {
        let recommendations = tdm_recommendations(85, 70, 75);

        assert!(recommendations
            .iter()
            .any(|r| r.contains("reduced parking ratios")));
        assert!(recommendations
            .iter()
            .any(|r| r.contains("subsidized transit passes")));
        assert!(!recommendations
            .iter()
            .any(|r| r.contains("robust TDM program")));
    }
}
