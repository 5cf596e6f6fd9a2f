use std::time::Instant;

use opentelemetry::KeyValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::db::reports::{self, CompleteReport, Report};
use crate::error::{AppError, AppResult};
use crate::llm::{GenerateRequest, LlmClient};
use crate::telemetry::metrics::{
    REPORT_GENERATION_DURATION, REPORT_SECTIONS, REPORTS_COMPLETED, REPORTS_FAILED,
};

use super::parse::parse_report_content;
use super::prompts::system_prompt;

/// Run generation for a queued report and drive it to a terminal status.
///
/// Any failure after the report row is loaded is converted into a `failed`
/// status write; if even that write fails, the error is logged and the report
/// stays observably `generating`.
#[tracing::instrument(
    name = "report.generate",
    skip(pool, llm_client, config),
    fields(report.type = tracing::field::Empty)
)]
pub async fn process_report(
    pool: &PgPool,
    llm_client: &LlmClient,
    config: &Config,
    report_id: Uuid,
) -> AppResult<()> {
    let report = reports::get_report(pool, report_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("report {report_id}")))?;

    if report.status.is_terminal() {
        tracing::warn!(report_id = %report_id, status = report.status.as_str(), "Report already terminal, skipping");
        return Ok(());
    }

    tracing::Span::current().record("report.type", report.report_type.as_str());

    let start = Instant::now();
    match generate_content(llm_client, config, &report).await {
        Ok(outcome) => {
            let transitioned = reports::mark_completed(
                pool,
                report_id,
                &CompleteReport {
                    summary: &outcome.content.summary,
                    sections: &outcome.content.sections,
                    key_metrics: &outcome.content.key_metrics,
                    recommendations: &outcome.content.recommendations,
                    tokens_used: Some(outcome.tokens_used),
                },
            )
            .await?;

            if transitioned {
                let type_kv =
                    KeyValue::new("report.type", report.report_type.as_str().to_string());
                REPORTS_COMPLETED.add(1, &[type_kv.clone()]);
                REPORT_GENERATION_DURATION.record(start.elapsed().as_secs_f64(), &[type_kv]);
                REPORT_SECTIONS.record(outcome.content.sections.len() as f64, &[]);
                tracing::info!(
                    report_id = %report_id,
                    sections = outcome.content.sections.len(),
                    tokens = outcome.tokens_used,
                    "Report completed"
                );
            } else {
                tracing::warn!(report_id = %report_id, "Completed content discarded, report no longer generating");
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(report_id = %report_id, error = %err, "Report generation failed");
            REPORTS_FAILED.add(
                1,
                &[KeyValue::new(
                    "report.type",
                    report.report_type.as_str().to_string(),
                )],
            );

            if let Err(write_err) = reports::mark_failed(pool, report_id).await {
                tracing::error!(
                    report_id = %report_id,
                    error = %write_err,
                    "Failed to mark report as failed"
                );
            }
            Err(err)
        }
    }
}

struct GenerationOutcome {
    content: super::parse::ReportContent,
    tokens_used: i32,
}

async fn generate_content(
    llm_client: &LlmClient,
    config: &Config,
    report: &Report,
) -> AppResult<GenerationOutcome> {
    let resp = llm_client
        .generate(&GenerateRequest {
            model: report.model.clone(),
            system: system_prompt(report.report_type),
            prompt: report.prompt.clone(),
            temperature: config.default_temperature,
            max_tokens: config.default_max_tokens,
            json: true,
            stage: "report_generation".to_string(),
        })
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let content = parse_report_content(&resp.content)?;
    let tokens_used = (resp.input_tokens + resp.output_tokens) as i32;

    Ok(GenerationOutcome {
        content,
        tokens_used,
    })
}
