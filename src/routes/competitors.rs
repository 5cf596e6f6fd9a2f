use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::db::businesses::Business;
use crate::db::competitors::Competitor;
use crate::error::{AppError, AppResult};
use crate::geo::distance_km;
use crate::scoring::{ThreatAnalysis, score_competitor};
use crate::telemetry::metrics::{COMPETITORS_ANALYZED, THREAT_SCORE};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub business_id: Uuid,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CompetitorView {
    #[serde(flatten)]
    pub competitor: Competitor,
    pub distance_km: Option<f64>,
    pub threat: ThreatAnalysis,
}

fn derive_distance(business: &Business, competitor: &Competitor) -> AppResult<Option<f64>> {
    match business.coordinates() {
        Some(from) => Ok(Some(distance_km(from, competitor.coordinates())?)),
        None => Ok(None),
    }
}

/// List with derived distance and a fresh threat score per competitor. The
/// read path never writes; stored analyses are only produced by `analyze`.
pub async fn list_competitors(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<CompetitorView>>> {
    let business = crate::db::businesses::get_business(&state.pool, params.business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("business".to_string()))?;

    let competitors = crate::db::competitors::list_for_business(
        &state.pool,
        business.id,
        params.limit.unwrap_or(50),
    )
    .await?;

    let mut views = Vec::with_capacity(competitors.len());
    for competitor in competitors {
        let distance = derive_distance(&business, &competitor)?;
        let threat = score_competitor(&competitor, distance, business.annual_revenue);
        views.push(CompetitorView {
            competitor,
            distance_km: distance,
            threat,
        });
    }

    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub business_id: Uuid,
}

/// Score one competitor and persist the result, overwriting any previous
/// analysis. Ownership is checked against the caller-supplied business id.
pub async fn analyze_competitor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnalyzeBody>,
) -> AppResult<Json<ThreatAnalysis>> {
    let competitor = crate::db::competitors::get_competitor(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Competitor {} not found", id)))?;

    if competitor.business_id != body.business_id {
        return Err(AppError::Forbidden(
            "competitor belongs to another business".to_string(),
        ));
    }

    let business = crate::db::businesses::get_business(&state.pool, body.business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("business".to_string()))?;

    let distance = derive_distance(&business, &competitor)?;
    let analysis = score_competitor(&competitor, distance, business.annual_revenue);

    crate::db::competitors::save_analysis(&state.pool, competitor.id, &analysis, Utc::now())
        .await?;

    COMPETITORS_ANALYZED.add(1, &[]);
    THREAT_SCORE.record(
        f64::from(analysis.score),
        &[KeyValue::new("threat.tier", analysis.tier.to_string())],
    );
    tracing::info!(
        competitor_id = %competitor.id,
        score = analysis.score,
        tier = %analysis.tier,
        "Competitor analyzed"
    );

    Ok(Json(analysis))
}
