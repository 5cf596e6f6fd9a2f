pub mod init;
pub mod metrics;

pub use init::init_telemetry;
pub use metrics::*;
