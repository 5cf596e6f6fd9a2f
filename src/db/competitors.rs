use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::scoring::ThreatAnalysis;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Competitor {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub industry: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub estimated_revenue: Option<f64>,
    pub employee_count: Option<i32>,
    pub market_share: Option<f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub threat_analysis: Option<sqlx::types::Json<ThreatAnalysis>>,
    pub analysis_generated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Competitor {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn stored_analysis(&self) -> Option<&ThreatAnalysis> {
        self.threat_analysis.as_ref().map(|json| &json.0)
    }
}

const COMPETITOR_COLUMNS: &str = "id, business_id, name, industry, city, state, lat, lng, \
     estimated_revenue, employee_count, market_share, strengths, weaknesses, \
     threat_analysis, analysis_generated_at, created_at";

#[tracing::instrument(name = "db.competitors.list", skip(pool))]
pub async fn list_for_business(
    pool: &PgPool,
    business_id: Uuid,
    limit: i64,
) -> Result<Vec<Competitor>, sqlx::Error> {
    sqlx::query_as::<_, Competitor>(&format!(
        "SELECT {COMPETITOR_COLUMNS} FROM competitors \
         WHERE business_id = $1 ORDER BY created_at DESC LIMIT $2",
    ))
    .bind(business_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[tracing::instrument(name = "db.competitors.get", skip(pool))]
pub async fn get_competitor(pool: &PgPool, id: Uuid) -> Result<Option<Competitor>, sqlx::Error> {
    sqlx::query_as::<_, Competitor>(&format!(
        "SELECT {COMPETITOR_COLUMNS} FROM competitors WHERE id = $1",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Cache-with-overwrite: replaces any previously stored analysis together
/// with its generation timestamp. Concurrent analyses of the same competitor
/// resolve last-writer-wins.
#[tracing::instrument(name = "db.competitors.save_analysis", skip(pool, analysis))]
pub async fn save_analysis(
    pool: &PgPool,
    id: Uuid,
    analysis: &ThreatAnalysis,
    generated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE competitors SET threat_analysis = $2, analysis_generated_at = $3 WHERE id = $1",
    )
    .bind(id)
    .bind(sqlx::types::Json(analysis))
    .bind(generated_at)
    .execute(pool)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "db.competitors.count", skip(pool))]
pub async fn count_for_business(pool: &PgPool, business_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM competitors WHERE business_id = $1")
        .bind(business_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

#[tracing::instrument(name = "db.competitors.count_by_tier", skip(pool))]
pub async fn count_by_tier(
    pool: &PgPool,
    business_id: Uuid,
    tier: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM competitors \
         WHERE business_id = $1 AND threat_analysis->>'tier' = $2",
    )
    .bind(business_id)
    .bind(tier)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}
