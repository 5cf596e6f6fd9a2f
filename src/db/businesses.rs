use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::geo::Coordinates;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub industry: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub annual_revenue: Option<f64>,
    pub employee_count: Option<i32>,
    pub market_share: Option<f64>,
    pub challenges: Vec<String>,
    pub goals: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Business {
    /// Absent when the business was never geocoded; callers must treat the
    /// competitor distance as unknown in that case.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

#[tracing::instrument(name = "db.businesses.get", skip(pool))]
pub async fn get_business(pool: &PgPool, id: Uuid) -> Result<Option<Business>, sqlx::Error> {
    sqlx::query_as::<_, Business>(
        "SELECT id, name, industry, description, city, state, country, lat, lng, \
         annual_revenue, employee_count, market_share, challenges, goals, created_at \
         FROM businesses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
