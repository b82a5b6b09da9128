use crate::core::scoring::sustainability_score;
use crate::models::Recommendation;

/// Deterministic density recommendation
///
/// Stands in for the AI narrative service whenever it is unavailable or
/// returns something unparsable. Pure and total: any valid score triple,
/// including all zeros, produces a complete recommendation in the same
/// shape the narrative service emits.
pub fn fallback_recommendation(walkability: u32, bikeability: u32, transit: u32) -> Recommendation {
    let sustainability = sustainability_score(walkability, bikeability, transit);

    let suggested_units = (20.0 + (walkability + bikeability + transit) as f64 / 15.0).round() as u32;
    let recommended_height = if transit > 60 { 4 } else { 3 };

    let reasoning = vec![
        format!(
            "Walkability score of {}/100 indicates {} pedestrian access",
            walkability,
            if walkability > 70 { "excellent" } else { "good" }
        ),
        format!(
            "Bikeability score of {}/100 shows {} cycling infrastructure",
            bikeability,
            if bikeability > 60 { "strong" } else { "moderate" }
        ),
        format!(
            "Transit score of {}/100 {} higher density",
            transit,
            if transit > 50 {
                "supports"
            } else {
                "suggests careful planning for"
            }
        ),
    ];

    let summary = format!(
        "This site shows {} multimodal potential with a sustainability score of {}/100.",
        if sustainability > 70 { "strong" } else { "moderate" },
        sustainability
    );

    Recommendation {
        suggested_units,
        recommended_height,
        reasoning,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_scale_with_scores() {
        let low = fallback_recommendation(0, 0, 0);
        let mid = fallback_recommendation(70, 50, 60);
        let high = fallback_recommendation(100, 100, 100);

        assert_eq!(low.suggested_units, 20);
        assert_eq!(mid.suggested_units, 32);
        assert_eq!(high.suggested_units, 40);
    }

    #[test]
    fn test_height_follows_transit() {
        assert_eq!(fallback_recommendation(50, 50, 61).recommended_height, 4);
        assert_eq!(fallback_recommendation(50, 50, 60).recommended_height, 3);
        assert_eq!(fallback_recommendation(90, 90, 0).recommended_height, 3);
    }

    #[test]
    fn test_all_zero_scores_still_produce_a_recommendation() {
        let recommendation = fallback_recommendation(0, 0, 0);

        assert_eq!(recommendation.reasoning.len(), 3);
        assert!(!recommendation.summary.is_empty());
        assert!(recommendation.summary.contains("0/100"));
    }

    #[test]
    fn test_reasoning_interpolates_thresholds() {
        let recommendation = fallback_recommendation(80, 70, 60);

        assert!(recommendation.reasoning[0].contains("excellent"));
        assert!(recommendation.reasoning[1].contains("strong"));
        assert!(recommendation.reasoning[2].contains("supports"));

        let recommendation = fallback_recommendation(40, 30, 20);

        assert!(recommendation.reasoning[0].contains("good"));
        assert!(recommendation.reasoning[1].contains("moderate"));
        assert!(recommendation.reasoning[2].contains("careful planning"));
    }
}
