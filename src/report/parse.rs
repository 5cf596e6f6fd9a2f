use serde::Deserialize;

use crate::db::reports::{KeyMetric, Recommendation, ReportSection};
use crate::error::AppError;

/// Structured payload the generation model must return. Collection fields
/// default to empty; a missing summary gets a stock line, matching the
/// "best effort over a valid response" policy.
#[derive(Debug, Deserialize)]
pub struct ReportContent {
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
    #[serde(default, alias = "keyMetrics")]
    pub key_metrics: Vec<KeyMetric>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

fn default_summary() -> String {
    "Report generated successfully".to_string()
}

/// Parse model output into report content. Tolerates fenced or embedded JSON;
/// a response with no parseable JSON object is a generation failure, never a
/// partially-written report.
pub fn parse_report_content(content: &str) -> Result<ReportContent, AppError> {
    let json_str = extract_json(content);
    serde_json::from_str::<ReportContent>(&json_str)
        .map_err(|e| AppError::Generation(format!("malformed report payload: {e}")))
}

pub(crate) fn extract_json(content: &str) -> String {
    if let Some(start) = content.find("```json")
        && let Some(end) = content[start + 7..].find("```")
    {
        return content[start + 7..start + 7 + end].trim().to_string();
    }
    if let Some(start) = content.find("```")
        && let Some(end) = content[start + 3..].find("```")
    {
        let inner = content[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }
    if let Some(start) = content.find('{')
        && let Some(end) = content.rfind('}')
    {
        return content[start..=end].to_string();
    }
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Level;

    #[test]
    fn test_extract_json_raw() {
        let input = r#"{"summary": "fine"}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_extract_json_markdown_block() {
        let input = "Here is the report:\n```json\n{\"summary\": \"fine\"}\n```\nDone.";
        assert_eq!(extract_json(input), "{\"summary\": \"fine\"}");
    }

    #[test]
    fn test_extract_json_generic_code_block() {
        let input = "```\n{\"summary\": \"fine\"}\n```";
        assert_eq!(extract_json(input), "{\"summary\": \"fine\"}");
    }

    #[test]
    fn test_extract_json_embedded_in_text() {
        let input = "The result is {\"a\": 1} and that's it.";
        assert_eq!(extract_json(input), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_full_payload() {
        let content = r#"{
            "summary": "The market is growing.",
            "sections": [
                {"title": "Overview", "content": "Detail", "insights": ["a", "b"]}
            ],
            "keyMetrics": [
                {"label": "Revenue", "value": "2M", "change": 5.2, "trend": "up"}
            ],
            "recommendations": [
                {"priority": "high", "title": "Expand", "description": "Open a branch",
                 "actionItems": ["scout locations"]}
            ]
        }"#;
        let parsed = parse_report_content(content).unwrap();
        assert_eq!(parsed.summary, "The market is growing.");
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].insights.len(), 2);
        assert_eq!(parsed.key_metrics[0].label, "Revenue");
        assert_eq!(parsed.recommendations[0].priority, Level::High);
        assert_eq!(parsed.recommendations[0].action_items, vec!["scout locations"]);
    }

    #[test]
    fn test_parse_minimal_payload_defaults() {
        let parsed = parse_report_content(r#"{"summary": "short"}"#).unwrap();
        assert!(parsed.sections.is_empty());
        assert!(parsed.key_metrics.is_empty());
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn test_parse_missing_summary_gets_stock_line() {
        let parsed = parse_report_content(r#"{"sections": []}"#).unwrap();
        assert_eq!(parsed.summary, "Report generated successfully");
    }

    #[test]
    fn test_parse_plain_text_is_an_error() {
        let err = parse_report_content("I could not produce a report today.");
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_truncated_json_is_an_error() {
        let err = parse_report_content(r#"{"summary": "cut off", "sections": [{"title""#);
        assert!(err.is_err());
    }
}
