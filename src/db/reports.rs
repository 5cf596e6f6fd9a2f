use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::scoring::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    MarketAnalysis,
    CompetitorAnalysis,
    GrowthStrategy,
    FinancialInsights,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::MarketAnalysis => "market_analysis",
            ReportType::CompetitorAnalysis => "competitor_analysis",
            ReportType::GrowthStrategy => "growth_strategy",
            ReportType::FinancialInsights => "financial_insights",
        }
    }
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "market_analysis" => Ok(ReportType::MarketAnalysis),
            "competitor_analysis" => Ok(ReportType::CompetitorAnalysis),
            "growth_strategy" => Ok(ReportType::GrowthStrategy),
            "financial_insights" => Ok(ReportType::FinancialInsights),
            other => Err(format!("unknown report type: {other}")),
        }
    }
}

/// Report status state machine: `generating` is the only initial state;
/// `completed` and `failed` are terminal and never transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Generating,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Generating => "generating",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Completed | ReportStatus::Failed)
    }
}

impl TryFrom<String> for ReportStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "generating" => Ok(ReportStatus::Generating),
            "completed" => Ok(ReportStatus::Completed),
            "failed" => Ok(ReportStatus::Failed),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMetric {
    pub label: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub trend: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default = "Recommendation::default_priority")]
    pub priority: Level,
    pub title: String,
    pub description: String,
    #[serde(default, alias = "actionItems")]
    pub action_items: Vec<String>,
}

impl Recommendation {
    fn default_priority() -> Level {
        Level::Medium
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub report_type: ReportType,
    #[sqlx(try_from = "String")]
    pub status: ReportStatus,
    pub summary: String,
    pub sections: sqlx::types::Json<Vec<ReportSection>>,
    pub key_metrics: sqlx::types::Json<Vec<KeyMetric>>,
    pub recommendations: sqlx::types::Json<Vec<Recommendation>>,
    pub competitor_ids: Vec<Uuid>,
    pub model: String,
    pub prompt: String,
    pub tokens_used: Option<i32>,
    pub generated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

const REPORT_COLUMNS: &str = "id, business_id, title, report_type, status, summary, sections, \
     key_metrics, recommendations, competitor_ids, model, prompt, tokens_used, \
     generated_at, created_at";

pub struct InsertReport<'a> {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: &'a str,
    pub report_type: ReportType,
    pub competitor_ids: &'a [Uuid],
    pub model: &'a str,
    pub prompt: &'a str,
}

/// Every generation request inserts a fresh row in `generating`; retries are
/// never merged into an existing row.
#[tracing::instrument(name = "db.reports.insert", skip_all)]
pub async fn insert_report(pool: &PgPool, params: &InsertReport<'_>) -> Result<Uuid, sqlx::Error> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO reports \
         (id, business_id, title, report_type, status, summary, sections, key_metrics, \
          recommendations, competitor_ids, model, prompt) \
         VALUES ($1, $2, $3, $4, 'generating', '', '[]'::jsonb, '[]'::jsonb, '[]'::jsonb, \
          $5, $6, $7) \
         RETURNING id",
    )
    .bind(params.id)
    .bind(params.business_id)
    .bind(params.title)
    .bind(params.report_type.as_str())
    .bind(params.competitor_ids)
    .bind(params.model)
    .bind(params.prompt)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

#[tracing::instrument(name = "db.reports.get", skip(pool))]
pub async fn get_report(pool: &PgPool, id: Uuid) -> Result<Option<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[tracing::instrument(name = "db.reports.list", skip(pool))]
pub async fn list_for_business(
    pool: &PgPool,
    business_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports \
         WHERE business_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    ))
    .bind(business_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub struct CompleteReport<'a> {
    pub summary: &'a str,
    pub sections: &'a [ReportSection],
    pub key_metrics: &'a [KeyMetric],
    pub recommendations: &'a [Recommendation],
    pub tokens_used: Option<i32>,
}

/// Transition `generating` -> `completed`. The status guard makes terminal
/// states immutable: a report that already completed or failed is left
/// untouched and `false` is returned.
#[tracing::instrument(name = "db.reports.mark_completed", skip(pool, content))]
pub async fn mark_completed(
    pool: &PgPool,
    id: Uuid,
    content: &CompleteReport<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE reports SET status = 'completed', summary = $2, sections = $3, \
         key_metrics = $4, recommendations = $5, tokens_used = $6, generated_at = NOW() \
         WHERE id = $1 AND status = 'generating'",
    )
    .bind(id)
    .bind(content.summary)
    .bind(sqlx::types::Json(content.sections))
    .bind(sqlx::types::Json(content.key_metrics))
    .bind(sqlx::types::Json(content.recommendations))
    .bind(content.tokens_used)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Transition `generating` -> `failed`, leaving content untouched so a failed
/// report never carries partial sections.
#[tracing::instrument(name = "db.reports.mark_failed", skip(pool))]
pub async fn mark_failed(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE reports SET status = 'failed', generated_at = NOW() \
         WHERE id = $1 AND status = 'generating'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(name = "db.reports.count", skip(pool))]
pub async fn count_for_business(pool: &PgPool, business_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports WHERE business_id = $1")
        .bind(business_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[tracing::instrument(name = "db.reports.count_by_status", skip(pool))]
pub async fn count_by_status(
    pool: &PgPool,
    business_id: Uuid,
    status: ReportStatus,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM reports WHERE business_id = $1 AND status = $2",
    )
    .bind(business_id)
    .bind(status.as_str())
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_round_trip() {
        for name in [
            "market_analysis",
            "competitor_analysis",
            "growth_strategy",
            "financial_insights",
        ] {
            let ty = ReportType::try_from(name.to_string()).unwrap();
            assert_eq!(ty.as_str(), name);
        }
    }

    #[test]
    fn test_report_type_rejects_unknown() {
        assert!(ReportType::try_from("vibes_analysis".to_string()).is_err());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!ReportStatus::Generating.is_terminal());
        assert!(ReportStatus::Completed.is_terminal());
        assert!(ReportStatus::Failed.is_terminal());
    }

    #[test]
    fn test_section_insights_default_empty() {
        let section: ReportSection =
            serde_json::from_str(r#"{"title": "Overview", "content": "text"}"#).unwrap();
        assert!(section.insights.is_empty());
    }

    #[test]
    fn test_recommendation_priority_defaults_medium() {
        let rec: Recommendation = serde_json::from_str(
            r#"{"title": "Expand", "description": "Open a second location"}"#,
        )
        .unwrap();
        assert_eq!(rec.priority, Level::Medium);
    }

    #[test]
    fn test_key_metric_accepts_string_or_number_value() {
        let m1: KeyMetric =
            serde_json::from_str(r#"{"label": "Revenue", "value": "1.2M"}"#).unwrap();
        let m2: KeyMetric = serde_json::from_str(r#"{"label": "Share", "value": 12.5}"#).unwrap();
        assert!(m1.value.is_string());
        assert!(m2.value.is_number());
    }
}
