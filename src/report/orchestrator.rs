use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::businesses::{self, Business};
use crate::db::competitors::{self, Competitor};
use crate::db::reports::{self, InsertReport, ReportStatus, ReportType};
use crate::error::{AppError, AppResult};
use crate::geo::distance_km;
use crate::jobs::JobQueue;
use crate::telemetry::metrics::REPORTS_REQUESTED;

use super::context::build_context;
use super::prompts::default_title;

const MAX_CONTEXT_COMPETITORS: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub business_id: Uuid,
    pub report_type: ReportType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub include_competitors: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportReceipt {
    pub report_id: Uuid,
    pub status: ReportStatus,
}

fn wants_competitors(req: &ReportRequest) -> bool {
    req.include_competitors || req.report_type == ReportType::CompetitorAnalysis
}

fn annotate_distances(
    business: &Business,
    competitors: Vec<Competitor>,
) -> AppResult<Vec<(Competitor, Option<f64>)>> {
    let origin = business.coordinates();
    competitors
        .into_iter()
        .map(|c| {
            let distance = match origin {
                Some(from) => Some(distance_km(from, c.coordinates())?),
                None => None,
            };
            Ok((c, distance))
        })
        .collect()
}

/// Accepts a generation request: persists a fresh report row in `generating`
/// with the built context stored as its prompt, enqueues the generation job,
/// and returns without waiting on the model.
#[tracing::instrument(name = "report.request", skip(pool, queue, req), fields(report.type = %req.report_type.as_str()))]
pub async fn request_report(
    pool: &sqlx::PgPool,
    queue: &JobQueue,
    model: &str,
    req: &ReportRequest,
) -> AppResult<ReportReceipt> {
    let business = businesses::get_business(pool, req.business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("business".to_string()))?;

    let competitors = if wants_competitors(req) {
        competitors::list_for_business(pool, business.id, MAX_CONTEXT_COMPETITORS).await?
    } else {
        Vec::new()
    };
    let annotated = annotate_distances(&business, competitors)?;
    let competitor_ids: Vec<Uuid> = annotated.iter().map(|(c, _)| c.id).collect();

    let context = build_context(&business, &annotated);
    let title = match req.title.as_deref() {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => default_title(req.report_type, &business.name),
    };

    let report_id = reports::insert_report(
        pool,
        &InsertReport {
            id: Uuid::new_v4(),
            business_id: business.id,
            title: &title,
            report_type: req.report_type,
            competitor_ids: &competitor_ids,
            model,
            prompt: &context,
        },
    )
    .await?;

    queue.enqueue_report_generation(report_id).await?;

    REPORTS_REQUESTED.add(
        1,
        &[KeyValue::new(
            "report.type",
            req.report_type.as_str().to_string(),
        )],
    );
    tracing::info!(report_id = %report_id, report_type = req.report_type.as_str(), "Report generation queued");

    Ok(ReportReceipt {
        report_id,
        status: ReportStatus::Generating,
    })
}
