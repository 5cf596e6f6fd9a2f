use serde::{Deserialize, Serialize};

use crate::db::businesses::Business;
use crate::db::trends::{Timeframe, Trend, TrendCategory};

use super::model::{Level, default_tier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRelevance {
    pub relevance_score: u8,
    pub business_impact: Level,
    pub actionability: u8,
    pub urgency: Level,
    pub recommendations: Vec<String>,
}

/// Additive relevance schedule. Components are budgeted so a perfect match
/// tops out at 100: industry 40, impact 30, confidence 20, timeframe 10.
pub fn score_trend(trend: &Trend, business: &Business) -> TrendRelevance {
    let mut relevance = 0.0_f64;
    let mut actionability = 50.0_f64;

    if trend.industry == business.industry {
        relevance += 40.0;
    } else if trend.related_industries.contains(&business.industry) {
        relevance += 20.0;
    }

    let mut urgency = match trend.impact {
        Level::High => {
            relevance += 30.0;
            Level::High
        }
        Level::Medium => {
            relevance += 20.0;
            Level::Medium
        }
        Level::Low => {
            relevance += 10.0;
            Level::Low
        }
    };

    relevance += (trend.confidence / 100.0) * 20.0;

    match trend.timeframe {
        Timeframe::ShortTerm => {
            relevance += 10.0;
            actionability += 20.0;
            urgency = urgency.raised();
        }
        Timeframe::MediumTerm => {
            relevance += 7.0;
            actionability += 10.0;
        }
        Timeframe::LongTerm => {
            relevance += 5.0;
        }
    }

    let relevance_score = relevance.round().clamp(0.0, 100.0) as u8;

    TrendRelevance {
        relevance_score,
        business_impact: default_tier(relevance_score),
        actionability: actionability.min(100.0) as u8,
        urgency,
        recommendations: recommendations(trend, relevance_score),
    }
}

fn recommendations(trend: &Trend, relevance_score: u8) -> Vec<String> {
    let mut out = Vec::new();

    if relevance_score >= 70 {
        out.push(
            "This trend is highly relevant to your business. Consider immediate action."
                .to_string(),
        );
    }
    if trend.timeframe == Timeframe::ShortTerm {
        out.push("Act quickly - this is a short-term trend with immediate impact.".to_string());
    }
    if trend.impact == Level::High {
        out.push(
            "High impact trend - allocate resources to capitalize on this opportunity."
                .to_string(),
        );
    }

    match trend.category {
        TrendCategory::Technology => {
            out.push("Evaluate technology adoption to stay competitive.".to_string());
        }
        TrendCategory::Regulatory => {
            out.push(
                "Review compliance requirements and adjust operations accordingly.".to_string(),
            );
        }
        TrendCategory::Consumer => {
            out.push("Adapt your offerings to meet changing consumer preferences.".to_string());
        }
        _ => {}
    }

    if let Some(opportunity) = trend.ai_opportunities.first() {
        out.push(format!("Explore opportunities: {opportunity}"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn business(industry: &str) -> Business {
        Business {
            id: Uuid::new_v4(),
            name: "Corner Roasters".to_string(),
            industry: industry.to_string(),
            description: None,
            city: None,
            state: None,
            country: None,
            lat: None,
            lng: None,
            annual_revenue: None,
            employee_count: None,
            market_share: None,
            challenges: vec![],
            goals: None,
            created_at: None,
        }
    }

    fn trend(
        industry: &str,
        impact: Level,
        timeframe: Timeframe,
        confidence: f64,
    ) -> Trend {
        Trend {
            id: Uuid::new_v4(),
            industry: industry.to_string(),
            category: TrendCategory::Market,
            title: "Subscription models spread".to_string(),
            description: "Recurring revenue models are replacing one-off sales".to_string(),
            impact,
            timeframe,
            confidence,
            related_industries: vec![],
            ai_summary: None,
            ai_opportunities: vec![],
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_scenario_exact_match_high_impact_short_term() {
        // 40 (exact industry) + 30 (high impact) + 18 (confidence 90)
        // + 10 (short term) = 98.
        let t = trend("food_service", Level::High, Timeframe::ShortTerm, 90.0);
        let b = business("food_service");
        let r = score_trend(&t, &b);

        assert_eq!(r.relevance_score, 98);
        assert_eq!(r.business_impact, Level::High);
        assert_eq!(r.urgency, Level::High);
        assert_eq!(r.actionability, 70);
    }

    #[test]
    fn test_related_industry_scores_half_of_exact() {
        let mut t = trend("logistics", Level::Medium, Timeframe::MediumTerm, 50.0);
        t.related_industries = vec!["retail".to_string()];
        let b = business("retail");

        let related = score_trend(&t, &b);
        t.industry = "retail".to_string();
        let exact = score_trend(&t, &b);

        assert_eq!(exact.relevance_score - related.relevance_score, 20);
    }

    #[test]
    fn test_unrelated_industry_gets_no_match_points() {
        let t = trend("aerospace", Level::Low, Timeframe::LongTerm, 0.0);
        let b = business("retail");
        let r = score_trend(&t, &b);
        // 0 + 10 (low impact) + 0 + 5 (long term) = 15.
        assert_eq!(r.relevance_score, 15);
        assert_eq!(r.business_impact, Level::Low);
        assert_eq!(r.urgency, Level::Low);
        assert_eq!(r.actionability, 50);
    }

    #[test]
    fn test_score_never_exceeds_100() {
        let t = trend("retail", Level::High, Timeframe::ShortTerm, 100.0);
        let b = business("retail");
        let r = score_trend(&t, &b);
        assert_eq!(r.relevance_score, 100);
        assert_eq!(r.actionability, 70);
    }

    #[test]
    fn test_short_term_raises_urgency_one_step() {
        let b = business("retail");

        let low = trend("retail", Level::Low, Timeframe::ShortTerm, 50.0);
        assert_eq!(score_trend(&low, &b).urgency, Level::Medium);

        let medium = trend("retail", Level::Medium, Timeframe::ShortTerm, 50.0);
        assert_eq!(score_trend(&medium, &b).urgency, Level::High);

        let high = trend("retail", Level::High, Timeframe::ShortTerm, 50.0);
        assert_eq!(score_trend(&high, &b).urgency, Level::High);
    }

    #[test]
    fn test_non_short_term_leaves_urgency_at_impact() {
        let b = business("retail");
        let t = trend("retail", Level::Low, Timeframe::LongTerm, 50.0);
        assert_eq!(score_trend(&t, &b).urgency, Level::Low);
    }

    #[test]
    fn test_category_recommendations() {
        let b = business("retail");
        let mut t = trend("retail", Level::Low, Timeframe::LongTerm, 10.0);

        t.category = TrendCategory::Technology;
        assert!(score_trend(&t, &b)
            .recommendations
            .iter()
            .any(|r| r.contains("technology adoption")));

        t.category = TrendCategory::Regulatory;
        assert!(score_trend(&t, &b)
            .recommendations
            .iter()
            .any(|r| r.contains("compliance")));

        t.category = TrendCategory::Economic;
        assert!(score_trend(&t, &b).recommendations.is_empty());
    }

    #[test]
    fn test_first_opportunity_echoed() {
        let b = business("retail");
        let mut t = trend("retail", Level::Low, Timeframe::LongTerm, 10.0);
        t.ai_opportunities = vec![
            "Bundle loyalty perks".to_string(),
            "Partner with couriers".to_string(),
        ];
        let r = score_trend(&t, &b);
        assert!(r
            .recommendations
            .iter()
            .any(|rec| rec == "Explore opportunities: Bundle loyalty perks"));
        assert!(!r.recommendations.iter().any(|rec| rec.contains("couriers")));
    }

    #[test]
    fn test_high_relevance_advisories_present() {
        let b = business("retail");
        let t = trend("retail", Level::High, Timeframe::ShortTerm, 90.0);
        let r = score_trend(&t, &b);
        assert!(r.recommendations.iter().any(|rec| rec.contains("highly relevant")));
        assert!(r.recommendations.iter().any(|rec| rec.contains("Act quickly")));
        assert!(r.recommendations.iter().any(|rec| rec.contains("High impact")));
    }
}
