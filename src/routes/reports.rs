use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::db::reports::Report;
use crate::error::{AppError, AppResult};
use crate::report::{ReportReceipt, ReportRequest, request_report};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub business_id: Uuid,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Accepts the request and returns 202 immediately; the worker picks the
/// generation job up from the queue.
pub async fn create_report(
    State(state): State<AppState>,
    Json(body): Json<ReportRequest>,
) -> AppResult<(StatusCode, Json<ReportReceipt>)> {
    let receipt = request_report(
        &state.pool,
        &state.job_queue,
        &state.config.llm_model,
        &body,
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<Report>>> {
    let limit = params.limit.unwrap_or(20);
    let offset = params.offset.unwrap_or(0);

    let reports =
        crate::db::reports::list_for_business(&state.pool, params.business_id, limit, offset)
            .await
            .map_err(AppError::Database)?;

    Ok(Json(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Report>> {
    let report = crate::db::reports::get_report(&state.pool, id)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_requires_business_id() {
        let query: Result<ListQuery, _> = serde_json::from_str("{}");
        assert!(query.is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = serde_json::from_str(
            r#"{"business_id": "6f31a7c2-6b58-4f9c-9c7a-0f2f8a9f2f11"}"#,
        )
        .unwrap();
        assert_eq!(query.limit, None);
        assert_eq!(query.offset, None);
    }

    #[test]
    fn test_create_report_body_deserialize() {
        let body: ReportRequest = serde_json::from_str(
            r#"{"business_id": "6f31a7c2-6b58-4f9c-9c7a-0f2f8a9f2f11",
                "report_type": "market_analysis",
                "title": "Q3 Market Review",
                "include_competitors": true}"#,
        )
        .unwrap();
        assert_eq!(body.title.as_deref(), Some("Q3 Market Review"));
        assert!(body.include_competitors);
    }
}
