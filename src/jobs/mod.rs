pub mod queue;

pub use queue::{Job, JobQueue, REPORT_GENERATION_KIND};
