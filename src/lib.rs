pub mod charts;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod jobs;
pub mod llm;
pub mod report;
pub mod routes;
pub mod scoring;
pub mod telemetry;

pub use config::Config;

use std::sync::Arc;

use sqlx::PgPool;

use jobs::JobQueue;
use llm::LlmClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub llm_client: Arc<LlmClient>,
    pub job_queue: JobQueue,
}
