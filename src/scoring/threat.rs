use serde::{Deserialize, Serialize};

use crate::db::competitors::Competitor;

use super::model::{FactorScore, Level, WeightedModel};

/// Weighted threat model: proximity dominates because physical overlap drives
/// customer contention more directly than relative scale.
fn threat_model() -> WeightedModel {
    WeightedModel::new(vec![
        ("proximity", 0.4),
        ("market_share", 0.3),
        ("revenue", 0.3),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatFactors {
    pub proximity: f64,
    pub market_share: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAnalysis {
    pub tier: Level,
    pub score: u8,
    pub factors: ThreatFactors,
    pub recommendations: Vec<String>,
}

/// Stepped proximity bands: closer competitors are a sharper threat. An
/// unknown distance is no data, not zero distance.
fn proximity_factor(distance_km: Option<f64>) -> FactorScore {
    match distance_km {
        None => FactorScore::unknown(),
        Some(d) if d < 5.0 => FactorScore::known(100.0),
        Some(d) if d < 10.0 => FactorScore::known(80.0),
        Some(d) if d < 25.0 => FactorScore::known(60.0),
        Some(d) if d < 50.0 => FactorScore::known(40.0),
        Some(d) if d < 100.0 => FactorScore::known(20.0),
        Some(_) => FactorScore::known(10.0),
    }
}

fn market_share_factor(market_share: Option<f64>) -> FactorScore {
    match market_share {
        Some(share) => FactorScore::known(share),
        None => FactorScore::unknown(),
    }
}

/// Ratio-banded against the owning business's revenue when both are known;
/// absolute-banded when only the competitor's revenue is known. The two
/// bandings use different cut points, so the factor is not comparable across
/// businesses with and without known revenue.
fn revenue_factor(competitor_revenue: Option<f64>, business_revenue: Option<f64>) -> FactorScore {
    match (competitor_revenue, business_revenue) {
        (Some(theirs), Some(ours)) if ours > 0.0 => {
            let ratio = theirs / ours;
            FactorScore::known(if ratio >= 2.0 {
                100.0
            } else if ratio >= 1.5 {
                80.0
            } else if ratio >= 1.0 {
                60.0
            } else if ratio >= 0.5 {
                40.0
            } else {
                20.0
            })
        }
        (Some(theirs), _) => FactorScore::known(if theirs > 10_000_000.0 {
            100.0
        } else if theirs > 5_000_000.0 {
            80.0
        } else if theirs > 1_000_000.0 {
            60.0
        } else if theirs > 500_000.0 {
            40.0
        } else {
            20.0
        }),
        (None, _) => FactorScore::unknown(),
    }
}

/// Pure threat scoring. Persisting the result onto the competitor record is a
/// separate, explicit operation (`db::competitors::save_analysis`); callers
/// choose whether to cache.
pub fn score_competitor(
    competitor: &Competitor,
    distance_km: Option<f64>,
    business_revenue: Option<f64>,
) -> ThreatAnalysis {
    let proximity = proximity_factor(distance_km);
    let market_share = market_share_factor(competitor.market_share);
    let revenue = revenue_factor(competitor.estimated_revenue, business_revenue);

    let model = threat_model();
    let score = model.overall(&[
        ("proximity", proximity),
        ("market_share", market_share),
        ("revenue", revenue),
    ]);
    let tier = model.tier(score);

    let mut recommendations = Vec::new();
    if proximity.value() >= 80.0 {
        recommendations.push("Consider local marketing to strengthen your presence".to_string());
    }
    if market_share.value() >= 70.0 {
        recommendations
            .push("Focus on differentiation and unique value propositions".to_string());
    }
    if revenue.value() >= 70.0 {
        recommendations.push("Analyze their pricing strategy and service offerings".to_string());
    }
    if !competitor.strengths.is_empty() {
        recommendations
            .push("Study their strengths and find opportunities to compete".to_string());
    }

    ThreatAnalysis {
        tier,
        score,
        factors: ThreatFactors {
            proximity: proximity.value(),
            market_share: market_share.value(),
            revenue: revenue.value(),
        },
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn competitor(
        market_share: Option<f64>,
        estimated_revenue: Option<f64>,
        strengths: Vec<String>,
    ) -> Competitor {
        Competitor {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Rival Traders".to_string(),
            industry: "retail".to_string(),
            city: None,
            state: None,
            lat: 19.0760,
            lng: 72.8777,
            estimated_revenue,
            employee_count: None,
            market_share,
            strengths,
            weaknesses: vec![],
            threat_analysis: None,
            analysis_generated_at: None,
            created_at: None,
        }
    }

    #[test]
    fn test_scenario_close_large_competitor() {
        // 3 km away, 50% market share, 2x our revenue:
        // round(100*0.4 + 50*0.3 + 100*0.3) = 85 -> high.
        let c = competitor(Some(50.0), Some(2_000_000.0), vec![]);
        let analysis = score_competitor(&c, Some(3.0), Some(1_000_000.0));

        assert_eq!(analysis.factors.proximity, 100.0);
        assert_eq!(analysis.factors.market_share, 50.0);
        assert_eq!(analysis.factors.revenue, 100.0);
        assert_eq!(analysis.score, 85);
        assert_eq!(analysis.tier, Level::High);
    }

    #[test]
    fn test_proximity_bands() {
        let cases = [
            (4.9, 100.0),
            (5.0, 80.0),
            (9.9, 80.0),
            (10.0, 60.0),
            (24.9, 60.0),
            (25.0, 40.0),
            (49.9, 40.0),
            (50.0, 20.0),
            (99.9, 20.0),
            (100.0, 10.0),
            (500.0, 10.0),
        ];
        for (distance, expected) in cases {
            assert_eq!(
                proximity_factor(Some(distance)).score,
                expected,
                "distance {distance}"
            );
        }
    }

    #[test]
    fn test_unknown_distance_degrades_proximity() {
        let c = competitor(Some(50.0), None, vec![]);
        let analysis = score_competitor(&c, None, None);
        assert_eq!(analysis.factors.proximity, 0.0);
        assert_eq!(analysis.score, 15);
        assert_eq!(analysis.tier, Level::Low);
    }

    #[test]
    fn test_increasing_distance_never_increases_score() {
        let c = competitor(Some(50.0), Some(2_000_000.0), vec![]);
        let near = score_competitor(&c, Some(4.0), Some(1_000_000.0));
        let far = score_competitor(&c, Some(60.0), Some(1_000_000.0));
        assert!(far.factors.proximity <= near.factors.proximity);
        assert!(far.score <= near.score);
    }

    #[test]
    fn test_revenue_ratio_bands() {
        let ours = Some(1_000_000.0);
        let cases = [
            (2_000_000.0, 100.0),
            (1_500_000.0, 80.0),
            (1_000_000.0, 60.0),
            (500_000.0, 40.0),
            (400_000.0, 20.0),
        ];
        for (theirs, expected) in cases {
            assert_eq!(revenue_factor(Some(theirs), ours).score, expected);
        }
    }

    #[test]
    fn test_revenue_absolute_bands_without_business_revenue() {
        let cases = [
            (15_000_000.0, 100.0),
            (6_000_000.0, 80.0),
            (2_000_000.0, 60.0),
            (600_000.0, 40.0),
            (100_000.0, 20.0),
        ];
        for (theirs, expected) in cases {
            assert_eq!(revenue_factor(Some(theirs), None).score, expected);
        }
    }

    #[test]
    fn test_revenue_unknown_when_competitor_revenue_absent() {
        assert!(!revenue_factor(None, Some(1_000_000.0)).known);
        assert!(!revenue_factor(None, None).known);
    }

    #[test]
    fn test_score_bounds_and_tier_consistency() {
        let combos = [
            (None, None, None),
            (Some(1.0), Some(100.0), Some(20_000_000.0)),
            (Some(200.0), Some(5.0), Some(100_000.0)),
        ];
        for (distance, share, revenue) in combos {
            let c = competitor(share, revenue, vec![]);
            let analysis = score_competitor(&c, distance, Some(1_000_000.0));
            assert!(analysis.score <= 100);
            let expected_tier = if analysis.score >= 70 {
                Level::High
            } else if analysis.score >= 40 {
                Level::Medium
            } else {
                Level::Low
            };
            assert_eq!(analysis.tier, expected_tier);
        }
    }

    #[test]
    fn test_recommendations_rules() {
        let c = competitor(
            Some(80.0),
            Some(2_000_000.0),
            vec!["brand recognition".to_string()],
        );
        let analysis = score_competitor(&c, Some(3.0), Some(1_000_000.0));
        assert_eq!(analysis.recommendations.len(), 4);

        let quiet = competitor(None, None, vec![]);
        let analysis = score_competitor(&quiet, Some(120.0), None);
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_scoring_is_pure() {
        let c = competitor(Some(35.0), Some(750_000.0), vec![]);
        let first = score_competitor(&c, Some(12.5), Some(900_000.0));
        let second = score_competitor(&c, Some(12.5), Some(900_000.0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_analysis_serde_round_trip() {
        let c = competitor(Some(50.0), Some(2_000_000.0), vec![]);
        let analysis = score_competitor(&c, Some(3.0), Some(1_000_000.0));
        let json = serde_json::to_string(&analysis).unwrap();
        let back: ThreatAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis, back);
        assert!(json.contains("\"tier\":\"high\""));
    }
}
