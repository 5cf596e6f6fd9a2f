//! Deterministic prose brief handed to the generation model. Stored verbatim
//! on the report row so a completed report can always be traced back to the
//! exact context it was generated from.

use crate::db::businesses::Business;
use crate::db::competitors::Competitor;

const MAX_TEXT_FIELD: usize = 500;

fn clip(s: &str) -> String {
    if s.len() <= MAX_TEXT_FIELD {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < MAX_TEXT_FIELD)
            .map(|(_, c)| c)
            .collect()
    }
}

fn or_not_provided(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => clip(v),
        _ => "Not provided".to_string(),
    }
}

/// `competitors` carries the derived distance alongside each record; distance
/// is never read from storage.
pub fn build_context(business: &Business, competitors: &[(Competitor, Option<f64>)]) -> String {
    let mut context = format!(
        "Business Information:\n\
         - Name: {}\n\
         - Industry: {}\n\
         - Description: {}\n\
         - Location: {}, {}, {}\n\
         - Employees: {}\n\
         - Annual Revenue: {}\n\
         - Market Share: {}\n\
         - Challenges: {}\n\
         - Goals: {}\n",
        business.name,
        business.industry,
        or_not_provided(business.description.as_deref()),
        or_not_provided(business.city.as_deref()),
        or_not_provided(business.state.as_deref()),
        or_not_provided(business.country.as_deref()),
        business
            .employee_count
            .map_or("Not provided".to_string(), |n| n.to_string()),
        business
            .annual_revenue
            .map_or("Not provided".to_string(), |r| format!("{r:.0}")),
        business
            .market_share
            .map_or("Not provided".to_string(), |s| format!("{s}%")),
        if business.challenges.is_empty() {
            "Not provided".to_string()
        } else {
            business.challenges.join(", ")
        },
        or_not_provided(business.goals.as_deref()),
    );

    if !competitors.is_empty() {
        context.push_str(&format!("\n\nCompetitors ({}):\n", competitors.len()));
        for (index, (comp, distance)) in competitors.iter().enumerate() {
            context.push_str(&format!(
                "\n{}. {}\n   \
                 - Industry: {}\n   \
                 - Location: {}, {}\n   \
                 - Distance: {}\n   \
                 - Revenue: {}\n   \
                 - Employees: {}\n   \
                 - Market Share: {}\n   \
                 - Threat Level: {}\n",
                index + 1,
                comp.name,
                comp.industry,
                or_not_provided(comp.city.as_deref()),
                or_not_provided(comp.state.as_deref()),
                distance.map_or("N/A".to_string(), |d| format!("{d:.1} km")),
                comp.estimated_revenue
                    .map_or("N/A".to_string(), |r| format!("{r:.0}")),
                comp.employee_count
                    .map_or("N/A".to_string(), |n| n.to_string()),
                comp.market_share
                    .map_or("N/A".to_string(), |s| format!("{s}%")),
                comp.stored_analysis()
                    .map_or("N/A".to_string(), |a| a.tier.to_string()),
            ));
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn business() -> Business {
        Business {
            id: Uuid::new_v4(),
            name: "Corner Roasters".to_string(),
            industry: "food_service".to_string(),
            description: Some("Specialty coffee roastery".to_string()),
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            country: Some("India".to_string()),
            lat: None,
            lng: None,
            annual_revenue: Some(2_000_000.0),
            employee_count: Some(12),
            market_share: None,
            challenges: vec!["rising bean prices".to_string()],
            goals: None,
            created_at: None,
        }
    }

    fn competitor(name: &str) -> Competitor {
        Competitor {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: name.to_string(),
            industry: "food_service".to_string(),
            city: Some("Pune".to_string()),
            state: None,
            lat: 18.52,
            lng: 73.85,
            estimated_revenue: None,
            employee_count: None,
            market_share: Some(20.0),
            strengths: vec![],
            weaknesses: vec![],
            threat_analysis: None,
            analysis_generated_at: None,
            created_at: None,
        }
    }

    #[test]
    fn test_context_is_deterministic() {
        let b = business();
        let comps = vec![(competitor("Bean Lab"), Some(3.25))];
        assert_eq!(build_context(&b, &comps), build_context(&b, &comps));
    }

    #[test]
    fn test_absent_fields_rendered_as_placeholders() {
        let b = business();
        let ctx = build_context(&b, &[(competitor("Bean Lab"), None)]);
        assert!(ctx.contains("Goals: Not provided"));
        assert!(ctx.contains("Distance: N/A"));
        assert!(ctx.contains("Revenue: N/A"));
        assert!(ctx.contains("Threat Level: N/A"));
    }

    #[test]
    fn test_known_fields_rendered() {
        let b = business();
        let ctx = build_context(&b, &[(competitor("Bean Lab"), Some(3.25))]);
        assert!(ctx.contains("Name: Corner Roasters"));
        assert!(ctx.contains("Annual Revenue: 2000000"));
        assert!(ctx.contains("Distance: 3.2 km"));
        assert!(ctx.contains("Market Share: 20%"));
        assert!(ctx.contains("Competitors (1):"));
    }

    #[test]
    fn test_no_competitor_block_when_empty() {
        let ctx = build_context(&business(), &[]);
        assert!(!ctx.contains("Competitors"));
    }

    #[test]
    fn test_long_description_clipped() {
        let mut b = business();
        b.description = Some("x".repeat(2000));
        let ctx = build_context(&b, &[]);
        assert!(ctx.len() < 2000);
    }
}
