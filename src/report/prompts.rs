use crate::db::reports::ReportType;

const BASE_PROMPT: &str = r#"You are a business intelligence analyst generating a comprehensive report. Return your analysis in JSON format with the following structure:

{
  "summary": "2-3 sentence executive summary",
  "sections": [
    {
      "title": "Section Title",
      "content": "Detailed content (markdown supported)",
      "insights": ["key insight 1", "key insight 2"]
    }
  ],
  "keyMetrics": [
    {
      "label": "Metric Name",
      "value": "Metric Value",
      "change": 5.2,
      "trend": "up"
    }
  ],
  "recommendations": [
    {
      "priority": "high",
      "title": "Recommendation Title",
      "description": "Detailed description",
      "actionItems": ["action 1", "action 2"]
    }
  ]
}"#;

/// Type-specific system instruction. Every variant requests the same fixed
/// response shape; only the analytical focus differs.
pub fn system_prompt(report_type: ReportType) -> String {
    let focus = match report_type {
        ReportType::MarketAnalysis => {
            "Focus on:\n\
             - Market size and growth potential\n\
             - Industry trends and dynamics\n\
             - Target customer segments\n\
             - Market opportunities and threats\n\
             - Competitive landscape overview\n\n\
             Include 3-4 sections with actionable insights."
        }
        ReportType::CompetitorAnalysis => {
            "Focus on:\n\
             - Competitive positioning\n\
             - Competitor strengths and weaknesses\n\
             - Market share analysis\n\
             - Differentiation opportunities\n\
             - Competitive threats and responses\n\n\
             Include detailed competitor comparisons and strategic recommendations."
        }
        ReportType::GrowthStrategy => {
            "Focus on:\n\
             - Growth opportunities\n\
             - Market expansion strategies\n\
             - Product/service development\n\
             - Customer acquisition strategies\n\
             - Scaling recommendations\n\n\
             Provide actionable growth roadmap with priorities."
        }
        ReportType::FinancialInsights => {
            "Focus on:\n\
             - Revenue analysis\n\
             - Cost optimization opportunities\n\
             - Profitability improvements\n\
             - Financial health indicators\n\
             - Investment recommendations\n\n\
             Include financial metrics and projections."
        }
    };

    format!("{BASE_PROMPT}\n\n{focus}")
}

pub fn default_title(report_type: ReportType, business_name: &str) -> String {
    match report_type {
        ReportType::MarketAnalysis => format!("Market Analysis Report - {business_name}"),
        ReportType::CompetitorAnalysis => {
            format!("Competitive Intelligence Report - {business_name}")
        }
        ReportType::GrowthStrategy => format!("Growth Strategy Report - {business_name}"),
        ReportType::FinancialInsights => format!("Financial Insights Report - {business_name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_prompt_requests_the_fixed_shape() {
        for ty in [
            ReportType::MarketAnalysis,
            ReportType::CompetitorAnalysis,
            ReportType::GrowthStrategy,
            ReportType::FinancialInsights,
        ] {
            let prompt = system_prompt(ty);
            assert!(prompt.contains("\"summary\""));
            assert!(prompt.contains("\"sections\""));
            assert!(prompt.contains("\"keyMetrics\""));
            assert!(prompt.contains("\"recommendations\""));
        }
    }

    #[test]
    fn test_prompts_differ_by_type() {
        assert_ne!(
            system_prompt(ReportType::MarketAnalysis),
            system_prompt(ReportType::GrowthStrategy)
        );
        assert!(system_prompt(ReportType::FinancialInsights).contains("Revenue analysis"));
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(
            default_title(ReportType::CompetitorAnalysis, "Corner Roasters"),
            "Competitive Intelligence Report - Corner Roasters"
        );
        assert_eq!(
            default_title(ReportType::MarketAnalysis, "Corner Roasters"),
            "Market Analysis Report - Corner Roasters"
        );
    }
}
