use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::db::trends::Trend;
use crate::error::{AppError, AppResult};
use crate::scoring::{TrendRelevance, score_trend};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub business_id: Uuid,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TrendView {
    #[serde(flatten)]
    pub trend: Trend,
    pub relevance: TrendRelevance,
}

/// Active trends scored against the requesting business.
pub async fn list_trends(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<TrendView>>> {
    let business = crate::db::businesses::get_business(&state.pool, params.business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("business".to_string()))?;

    let trends =
        crate::db::trends::list_active(&state.pool, params.limit.unwrap_or(50)).await?;

    let views = trends
        .into_iter()
        .map(|trend| {
            let relevance = score_trend(&trend, &business);
            TrendView { trend, relevance }
        })
        .collect();

    Ok(Json(views))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_deserialize() {
        let query: ListQuery = serde_json::from_str(
            r#"{"business_id": "6f31a7c2-6b58-4f9c-9c7a-0f2f8a9f2f11"}"#,
        )
        .unwrap();
        assert!(query.limit.is_none());
    }
}
