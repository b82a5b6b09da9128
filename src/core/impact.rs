use thiserror::Error;

use crate::models::{
    DevelopmentImpact, DevelopmentScenario, GhgBaseline, GhgEquivalents, GhgResult, ImpactSummary,
    SustainabilityRating, VmtBaseline, VmtResult,
};

// VMT and GHG model constants, California-calibrated (CARB methodology).

/// Statewide average vehicle miles traveled per capita, miles/day
pub const BASELINE_VMT_PER_CAPITA: f64 = 20.8;
/// Average household size, persons per unit
pub const AVG_HOUSEHOLD_SIZE: f64 = 2.5;
/// Emissions per vehicle mile, lbs CO2e
pub const GHG_LBS_PER_MILE: f64 = 0.89;
/// Pounds to kilograms
pub const LBS_TO_KG: f64 = 0.453592;
/// Kilograms to pounds
pub const KG_TO_LBS: f64 = 2.20462;
/// One average car emits ~4.6 metric tons CO2e per year
pub const ANNUAL_CAR_EMISSIONS_TONS: f64 = 4.6;
/// One tree absorbs ~48 lbs CO2 per year
pub const TREE_ABSORPTION_LBS: f64 = 48.0;

/// Maximum VMT reduction attributable to walkability
const WALK_REDUCTION_CEILING: f64 = 0.30;
/// Maximum VMT reduction attributable to bike infrastructure
const BIKE_REDUCTION_CEILING: f64 = 0.15;
/// Maximum VMT reduction attributable to transit access
const TRANSIT_REDUCTION_CEILING: f64 = 0.25;

#[derive(Debug, Error)]
pub enum ImpactError {
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Project daily and annual vehicle miles traveled for a scenario
///
/// Each accessibility score contributes a reduction up to its mode
/// ceiling. The contributions compose multiplicatively rather than
/// additively: a resident who already walks does not independently save
/// the full transit-driven miles too, so stacked mechanisms show
/// diminishing returns and the combined reduction stays below 100%.
pub fn calculate_vmt(scenario: &DevelopmentScenario) -> Result<VmtResult, ImpactError> {
    if scenario.units == 0 {
        return Err(ImpactError::InvalidScenario(
            "units must be positive".to_string(),
        ));
    }

    let population = scenario.units as f64 * AVG_HOUSEHOLD_SIZE;

    let walk_factor = scenario.walkability_score as f64 / 100.0;
    let bike_factor = scenario.bikeability_score as f64 / 100.0;
    let transit_factor = scenario.transit_score as f64 / 100.0;

    let walk_reduction = walk_factor * WALK_REDUCTION_CEILING;
    let bike_reduction = bike_factor * BIKE_REDUCTION_CEILING;
    let transit_reduction = transit_factor * TRANSIT_REDUCTION_CEILING;

    let total_reduction =
        1.0 - (1.0 - walk_reduction) * (1.0 - bike_reduction) * (1.0 - transit_reduction);

    let adjusted_per_capita = BASELINE_VMT_PER_CAPITA * (1.0 - total_reduction);
    let daily_total = adjusted_per_capita * population;
    let annual_total = daily_total * 365.0;

    let baseline_daily_total = BASELINE_VMT_PER_CAPITA * population;

    Ok(VmtResult {
        daily_vmt_per_capita: round1(adjusted_per_capita),
        daily_vmt_total: daily_total.round(),
        annual_vmt_total: annual_total.round(),
        vmt_reduction_percent: (total_reduction * 100.0).round(),
        baseline: VmtBaseline {
            daily_vmt_per_capita: BASELINE_VMT_PER_CAPITA,
            daily_vmt_total: baseline_daily_total.round(),
            annual_vmt_total: (baseline_daily_total * 365.0).round(),
        },
    })
}

/// Derive greenhouse gas emissions from a VMT projection
///
/// GHG reduction tracks VMT reduction 1:1; the model carries no
/// independent emissions-intensity term.
pub fn calculate_ghg(vmt: &VmtResult) -> GhgResult {
    let daily_ghg = vmt.daily_vmt_total * GHG_LBS_PER_MILE * LBS_TO_KG;
    let annual_ghg = daily_ghg * 365.0 / 1000.0;

    let baseline_daily_ghg = vmt.baseline.daily_vmt_total * GHG_LBS_PER_MILE * LBS_TO_KG;
    let baseline_annual_ghg = baseline_daily_ghg * 365.0 / 1000.0;

    let annual_savings = baseline_annual_ghg - annual_ghg;

    GhgResult {
        daily_ghg_kg: round1(daily_ghg),
        annual_ghg_tons: round2(annual_ghg),
        ghg_reduction_percent: vmt.vmt_reduction_percent,
        baseline: GhgBaseline {
            daily_ghg_kg: round1(baseline_daily_ghg),
            annual_ghg_tons: round2(baseline_annual_ghg),
        },
        equivalents: equivalents_for_savings(annual_savings),
    }
}

/// Express annual emissions savings as cars off the road and trees planted
pub(crate) fn equivalents_for_savings(annual_savings_tons: f64) -> GhgEquivalents {
    GhgEquivalents {
        cars_off_road: round1(annual_savings_tons / ANNUAL_CAR_EMISSIONS_TONS),
        trees_planted: (annual_savings_tons * 1000.0 * KG_TO_LBS / TREE_ABSORPTION_LBS).round()
            as u32,
    }
}

/// Full base impact for a scenario: VMT, GHG and the headline summary
pub fn development_impact(scenario: &DevelopmentScenario) -> Result<DevelopmentImpact, ImpactError> {
    let vmt = calculate_vmt(scenario)?;
    let ghg = calculate_ghg(&vmt);

    let summary = ImpactSummary {
        population: scenario.units as f64 * AVG_HOUSEHOLD_SIZE,
        annual_vmt_saved: vmt.baseline.annual_vmt_total - vmt.annual_vmt_total,
        annual_ghg_saved: round2(ghg.baseline.annual_ghg_tons - ghg.annual_ghg_tons),
        sustainability_rating: sustainability_rating(vmt.vmt_reduction_percent),
    };

    Ok(DevelopmentImpact { vmt, ghg, summary })
}

/// Categorical rating for a VMT reduction percentage
///
/// Thresholds are inclusive lower bounds, evaluated highest-first.
pub fn sustainability_rating(vmt_reduction_percent: f64) -> SustainabilityRating {
    if vmt_reduction_percent >= 40.0 {
        SustainabilityRating::Excellent
    } else if vmt_reduction_percent >= 25.0 {
        SustainabilityRating::VeryGood
    } else if vmt_reduction_percent >= 15.0 {
        SustainabilityRating::Good
    } else if vmt_reduction_percent >= 5.0 {
        SustainabilityRating::Fair
    } else {
        SustainabilityRating::Baseline
    }
}
