use serde::{Deserialize, Serialize};

/// Discrete low/medium/high classification shared by threat tiers, trend
/// impact, business impact, urgency and recommendation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    /// One-step escalation, saturating at High.
    pub fn raised(self) -> Level {
        match self {
            Level::Low => Level::Medium,
            Level::Medium | Level::High => Level::High,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A factor score on the 0-100 scale, carrying whether the underlying datum
/// was present at all. An unknown factor contributes nothing to a weighted
/// aggregate; this keeps "no data" distinguishable from a genuinely low score
/// while producing the same numbers as treating absence as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScore {
    pub score: f64,
    pub known: bool,
}

impl FactorScore {
    pub fn known(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            known: true,
        }
    }

    pub fn unknown() -> Self {
        Self {
            score: 0.0,
            known: false,
        }
    }

    /// The value that enters a breakdown: 0.0 when unknown.
    pub fn value(&self) -> f64 {
        if self.known { self.score } else { 0.0 }
    }
}

/// Weighted-factor aggregator: named weights summing to 1.0, an overall score
/// of round(sum(factor * weight)) clamped to [0, 100], and a tier classifier
/// with two configurable cut points.
#[derive(Debug, Clone)]
pub struct WeightedModel {
    weights: Vec<(&'static str, f64)>,
    high_cut: f64,
    medium_cut: f64,
}

pub const DEFAULT_HIGH_CUT: f64 = 70.0;
pub const DEFAULT_MEDIUM_CUT: f64 = 40.0;

impl WeightedModel {
    pub fn new(weights: Vec<(&'static str, f64)>) -> Self {
        debug_assert!(
            (weights.iter().map(|(_, w)| w).sum::<f64>() - 1.0).abs() < 1e-9,
            "factor weights must sum to 1.0"
        );
        Self {
            weights,
            high_cut: DEFAULT_HIGH_CUT,
            medium_cut: DEFAULT_MEDIUM_CUT,
        }
    }

    pub fn with_cut_points(mut self, high: f64, medium: f64) -> Self {
        debug_assert!(medium < high);
        self.high_cut = high;
        self.medium_cut = medium;
        self
    }

    pub fn overall(&self, factors: &[(&str, FactorScore)]) -> u8 {
        let sum: f64 = self
            .weights
            .iter()
            .map(|(name, weight)| {
                factors
                    .iter()
                    .find(|(n, f)| n == name && f.known)
                    .map(|(_, f)| f.score * weight)
                    .unwrap_or(0.0)
            })
            .sum();

        sum.round().clamp(0.0, 100.0) as u8
    }

    pub fn tier(&self, score: u8) -> Level {
        if f64::from(score) >= self.high_cut {
            Level::High
        } else if f64::from(score) >= self.medium_cut {
            Level::Medium
        } else {
            Level::Low
        }
    }
}

/// Tier classification with the default 70/40 cut points, for scores computed
/// outside a weighted model (trend relevance uses the same cuts).
pub fn default_tier(score: u8) -> Level {
    if f64::from(score) >= DEFAULT_HIGH_CUT {
        Level::High
    } else if f64::from(score) >= DEFAULT_MEDIUM_CUT {
        Level::Medium
    } else {
        Level::Low
    }
}
