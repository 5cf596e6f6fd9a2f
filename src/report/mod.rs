pub mod context;
pub mod generate;
pub mod orchestrator;
pub mod parse;
pub mod prompts;

pub use generate::process_report;
pub use orchestrator::{ReportReceipt, ReportRequest, request_report};
