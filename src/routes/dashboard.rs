use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::charts::{ChartDataset, report_analytics};
use crate::db::businesses::Business;
use crate::db::reports::ReportStatus;
use crate::db::{competitors, reports, trends};
use crate::error::{AppError, AppResult};
use crate::geo::distance_km;

const NEARBY_RADIUS_KM: f64 = 50.0;
const DASHBOARD_COMPETITOR_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub business_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CompetitorStats {
    pub total: i64,
    pub high_threat: i64,
    pub nearby: i64,
}

#[derive(Debug, Serialize)]
pub struct ReportStats {
    pub total: i64,
    pub completed: i64,
    pub generating: i64,
}

#[derive(Debug, Serialize)]
pub struct TrendStats {
    pub active: i64,
    pub high_impact: i64,
}

#[derive(Debug, Serialize)]
pub struct BusinessSummary {
    pub name: String,
    pub industry: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub business: BusinessSummary,
    pub competitors: CompetitorStats,
    pub reports: ReportStats,
    pub trends: TrendStats,
}

async fn load_business(state: &AppState, id: Uuid) -> AppResult<Business> {
    crate::db::businesses::get_business(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("business".to_string()))
}

/// Nearby means derived distance under 50 km; businesses without coordinates
/// have no nearby competitors.
async fn count_nearby(state: &AppState, business: &Business) -> AppResult<i64> {
    let Some(origin) = business.coordinates() else {
        return Ok(0);
    };

    let competitors = competitors::list_for_business(
        &state.pool,
        business.id,
        DASHBOARD_COMPETITOR_LIMIT,
    )
    .await?;

    let mut nearby = 0;
    for c in &competitors {
        if distance_km(origin, c.coordinates())? < NEARBY_RADIUS_KM {
            nearby += 1;
        }
    }
    Ok(nearby)
}

pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<Json<DashboardStats>> {
    let business = load_business(&state, params.business_id).await?;

    let total_competitors = competitors::count_for_business(&state.pool, business.id).await?;
    let high_threat = competitors::count_by_tier(&state.pool, business.id, "high").await?;
    let nearby = count_nearby(&state, &business).await?;

    let total_reports = reports::count_for_business(&state.pool, business.id).await?;
    let completed =
        reports::count_by_status(&state.pool, business.id, ReportStatus::Completed).await?;
    let generating =
        reports::count_by_status(&state.pool, business.id, ReportStatus::Generating).await?;

    let active_trends = trends::count_active(&state.pool).await?;
    let high_impact = trends::count_high_impact(&state.pool).await?;

    Ok(Json(DashboardStats {
        business: BusinessSummary {
            name: business.name,
            industry: business.industry,
        },
        competitors: CompetitorStats {
            total: total_competitors,
            high_threat,
            nearby,
        },
        reports: ReportStats {
            total: total_reports,
            completed,
            generating,
        },
        trends: TrendStats {
            active: active_trends,
            high_impact,
        },
    }))
}

pub async fn charts(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<Json<Vec<ChartDataset>>> {
    let business = load_business(&state, params.business_id).await?;

    let competitors = competitors::list_for_business(
        &state.pool,
        business.id,
        DASHBOARD_COMPETITOR_LIMIT,
    )
    .await?;

    let origin = business.coordinates();
    let mut distances = Vec::with_capacity(competitors.len());
    for c in &competitors {
        let d = match origin {
            Some(from) => Some(distance_km(from, c.coordinates())?),
            None => None,
        };
        distances.push(d);
    }

    Ok(Json(report_analytics(&business, &competitors, &distances)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_query_requires_business_id() {
        assert!(serde_json::from_str::<DashboardQuery>("{}").is_err());
    }

    #[test]
    fn test_stats_serialization_shape() {
        let stats = DashboardStats {
            business: BusinessSummary {
                name: "Corner Roasters".to_string(),
                industry: "food_service".to_string(),
            },
            competitors: CompetitorStats {
                total: 4,
                high_threat: 1,
                nearby: 2,
            },
            reports: ReportStats {
                total: 3,
                completed: 2,
                generating: 1,
            },
            trends: TrendStats {
                active: 7,
                high_impact: 3,
            },
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["competitors"]["nearby"], 2);
        assert_eq!(json["reports"]["generating"], 1);
        assert_eq!(json["trends"]["high_impact"], 3);
    }
}
