use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::scoring::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Technology,
    Market,
    Consumer,
    Regulatory,
    Economic,
    Social,
}

impl TrendCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendCategory::Technology => "technology",
            TrendCategory::Market => "market",
            TrendCategory::Consumer => "consumer",
            TrendCategory::Regulatory => "regulatory",
            TrendCategory::Economic => "economic",
            TrendCategory::Social => "social",
        }
    }
}

impl TryFrom<String> for TrendCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "technology" => Ok(TrendCategory::Technology),
            "market" => Ok(TrendCategory::Market),
            "consumer" => Ok(TrendCategory::Consumer),
            "regulatory" => Ok(TrendCategory::Regulatory),
            "economic" => Ok(TrendCategory::Economic),
            "social" => Ok(TrendCategory::Social),
            other => Err(format!("unknown trend category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::ShortTerm => "short_term",
            Timeframe::MediumTerm => "medium_term",
            Timeframe::LongTerm => "long_term",
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "short_term" => Ok(Timeframe::ShortTerm),
            "medium_term" => Ok(Timeframe::MediumTerm),
            "long_term" => Ok(Timeframe::LongTerm),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Trends are global records, not owned by a business; `is_active` gates
/// visibility.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Trend {
    pub id: Uuid,
    pub industry: String,
    #[sqlx(try_from = "String")]
    pub category: TrendCategory,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub impact: Level,
    #[sqlx(try_from = "String")]
    pub timeframe: Timeframe,
    pub confidence: f64,
    pub related_industries: Vec<String>,
    pub ai_summary: Option<String>,
    pub ai_opportunities: Vec<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

const TREND_COLUMNS: &str = "id, industry, category, title, description, impact, timeframe, \
     confidence, related_industries, ai_summary, ai_opportunities, is_active, created_at";

#[tracing::instrument(name = "db.trends.list_active", skip(pool))]
pub async fn list_active(pool: &PgPool, limit: i64) -> Result<Vec<Trend>, sqlx::Error> {
    sqlx::query_as::<_, Trend>(&format!(
        "SELECT {TREND_COLUMNS} FROM trends \
         WHERE is_active = TRUE ORDER BY created_at DESC LIMIT $1",
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[tracing::instrument(name = "db.trends.count_active", skip(pool))]
pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trends WHERE is_active = TRUE")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[tracing::instrument(name = "db.trends.count_high_impact", skip(pool))]
pub async fn count_high_impact(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM trends WHERE is_active = TRUE AND impact = 'high'",
    )
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for name in [
            "technology",
            "market",
            "consumer",
            "regulatory",
            "economic",
            "social",
        ] {
            let cat = TrendCategory::try_from(name.to_string()).unwrap();
            assert_eq!(cat.as_str(), name);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert!(TrendCategory::try_from("astrology".to_string()).is_err());
    }

    #[test]
    fn test_timeframe_round_trip() {
        for name in ["short_term", "medium_term", "long_term"] {
            let tf = Timeframe::try_from(name.to_string()).unwrap();
            assert_eq!(tf.as_str(), name);
        }
    }

    #[test]
    fn test_level_try_from() {
        assert_eq!(Level::try_from("high".to_string()).unwrap(), Level::High);
        assert!(Level::try_from("severe".to_string()).is_err());
    }
}
