use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use sqlx::PgPool;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

use market_scout::jobs::{JobQueue, REPORT_GENERATION_KIND};
use market_scout::llm::LlmClient;
use market_scout::report::process_report;
use market_scout::telemetry::init_telemetry;
use market_scout::{Config, db, jobs::Job};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        environment = %config.environment,
        poll_interval_secs = config.worker_poll_interval_secs,
        "Starting market-scout worker"
    );

    let pool = db::create_pool(&config.database_url).await?;
    let llm_client = LlmClient::from_config(&config);
    let job_queue = JobQueue::new(pool.clone());

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let worker_handle = {
        let job_queue = job_queue.clone();
        let pool = pool.clone();
        let llm_client = llm_client.clone();
        let config = config.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(config.worker_poll_interval_secs));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = process_job(&job_queue, &pool, &llm_client, &config).await {
                            tracing::error!(error = %e, "Error processing job");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Worker received shutdown signal");
                        break;
                    }
                }
            }
        })
    };

    shutdown_signal().await;
    let _ = shutdown_tx.send(());

    worker_handle.await?;

    tracing::info!("Worker shutdown complete");
    let _ = telemetry_guard.shutdown();

    Ok(())
}

async fn process_job(
    job_queue: &JobQueue,
    pool: &PgPool,
    llm_client: &Arc<LlmClient>,
    config: &Config,
) -> anyhow::Result<()> {
    let Some(job) = job_queue.dequeue().await? else {
        return Ok(());
    };

    let parent_context = extract_trace_context(&job.trace_context);

    let span = tracing::info_span!(
        "job.process",
        job_id = job.id,
        job_kind = %job.kind,
    );
    let _ = span.set_parent(parent_context);

    async {
        tracing::info!(job_id = job.id, kind = %job.kind, "Processing job");

        let result = match job.kind.as_str() {
            REPORT_GENERATION_KIND => handle_report_generation(&job, pool, llm_client, config).await,
            _ => {
                tracing::warn!(job_id = job.id, kind = %job.kind, "Unknown job kind");
                Err(anyhow::anyhow!("Unknown job kind: {}", job.kind))
            }
        };

        match result {
            Ok(()) => {
                job_queue.complete(job.id).await?;
                tracing::info!(job_id = job.id, "Job completed");
            }
            Err(e) => {
                job_queue.fail(job.id, &e.to_string()).await?;
                tracing::error!(job_id = job.id, error = %e, "Job failed");
            }
        }

        Ok(())
    }
    .instrument(span)
    .await
}

async fn handle_report_generation(
    job: &Job,
    pool: &PgPool,
    llm_client: &Arc<LlmClient>,
    config: &Config,
) -> anyhow::Result<()> {
    let report_id: Uuid = job
        .payload
        .get("report_id")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("job payload missing report_id"))?;

    process_report(pool, llm_client, config, report_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))
}

fn extract_trace_context(trace_context: &Option<serde_json::Value>) -> opentelemetry::Context {
    let Some(ctx_value) = trace_context else {
        return opentelemetry::Context::new();
    };

    let carrier: HashMap<String, String> = match serde_json::from_value(ctx_value.clone()) {
        Ok(c) => c,
        Err(_) => return opentelemetry::Context::new(),
    };

    let propagator = TraceContextPropagator::new();
    propagator.extract(&carrier)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
