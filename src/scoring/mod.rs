pub mod model;
pub mod relevance;
pub mod threat;

pub use model::{FactorScore, Level, WeightedModel};
pub use relevance::{TrendRelevance, score_trend};
pub use threat::{ThreatAnalysis, ThreatFactors, score_competitor};
