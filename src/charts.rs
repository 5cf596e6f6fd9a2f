//! Dataset descriptors for the dashboard and for report visual sections.
//!
//! Each aggregator filters out records missing the relevant field before
//! sorting or binning; absence is never coerced to zero.

use serde::Serialize;

use crate::db::businesses::Business;
use crate::db::competitors::Competitor;
use crate::scoring::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: Option<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// Market share per competitor, with the owning business prepended when its
/// own share is known.
pub fn market_share_distribution(
    business: &Business,
    competitors: &[Competitor],
) -> Option<ChartDataset> {
    let mut entries: Vec<(&str, f64)> = competitors
        .iter()
        .filter_map(|c| c.market_share.map(|share| (c.name.as_str(), share)))
        .collect();
    if entries.is_empty() {
        return None;
    }
    if let Some(share) = business.market_share {
        entries.insert(0, (business.name.as_str(), share));
    }

    Some(ChartDataset {
        kind: ChartKind::Pie,
        title: "Market Share Distribution".to_string(),
        labels: entries.iter().map(|(name, _)| name.to_string()).collect(),
        series: vec![Series {
            label: None,
            values: entries.iter().map(|(_, share)| *share).collect(),
        }],
    })
}

/// Top-10 competitors by revenue, scaled to millions, business first.
pub fn revenue_comparison(business: &Business, competitors: &[Competitor]) -> Option<ChartDataset> {
    let mut ranked: Vec<(&str, f64)> = competitors
        .iter()
        .filter_map(|c| c.estimated_revenue.map(|rev| (c.name.as_str(), rev)))
        .collect();
    if ranked.is_empty() {
        return None;
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(10);
    if let Some(revenue) = business.annual_revenue {
        ranked.insert(0, (business.name.as_str(), revenue));
    }

    Some(ChartDataset {
        kind: ChartKind::Bar,
        title: "Revenue Comparison (in Millions)".to_string(),
        labels: ranked.iter().map(|(name, _)| name.to_string()).collect(),
        series: vec![Series {
            label: Some("Revenue (M)".to_string()),
            values: ranked.iter().map(|(_, rev)| rev / 1_000_000.0).collect(),
        }],
    })
}

const DISTANCE_BINS: [(&str, f64, f64); 5] = [
    ("0-10 km", 0.0, 10.0),
    ("10-25 km", 10.0, 25.0),
    ("25-50 km", 25.0, 50.0),
    ("50-100 km", 50.0, 100.0),
    ("100+ km", 100.0, f64::INFINITY),
];

/// Histogram of competitor distances over fixed half-open bins. Unknown
/// distances are dropped, not binned at zero.
pub fn distance_histogram(distances: &[Option<f64>]) -> Option<ChartDataset> {
    let known: Vec<f64> = distances.iter().flatten().copied().collect();
    if known.is_empty() {
        return None;
    }

    let mut counts = [0_u32; DISTANCE_BINS.len()];
    for distance in &known {
        for (i, (_, min, max)) in DISTANCE_BINS.iter().enumerate() {
            if *distance >= *min && *distance < *max {
                counts[i] += 1;
                break;
            }
        }
    }

    Some(ChartDataset {
        kind: ChartKind::Histogram,
        title: "Competitor Distribution by Distance".to_string(),
        labels: DISTANCE_BINS.iter().map(|(l, _, _)| l.to_string()).collect(),
        series: vec![Series {
            label: Some("Number of Competitors".to_string()),
            values: counts.iter().map(|c| f64::from(*c)).collect(),
        }],
    })
}

/// Distribution of stored threat tiers. Competitors never analyzed are
/// excluded rather than assumed medium.
pub fn threat_tier_distribution(competitors: &[Competitor]) -> Option<ChartDataset> {
    let tiers: Vec<Level> = competitors
        .iter()
        .filter_map(|c| c.stored_analysis().map(|a| a.tier))
        .collect();
    if tiers.is_empty() {
        return None;
    }

    let count = |level| tiers.iter().filter(|t| **t == level).count() as f64;
    Some(ChartDataset {
        kind: ChartKind::Pie,
        title: "Competitive Threat Distribution".to_string(),
        labels: vec![
            "High Threat".to_string(),
            "Medium Threat".to_string(),
            "Low Threat".to_string(),
        ],
        series: vec![Series {
            label: None,
            values: vec![count(Level::High), count(Level::Medium), count(Level::Low)],
        }],
    })
}

/// Competitor counts per industry, top 8 by count.
pub fn industry_distribution(competitors: &[Competitor]) -> Option<ChartDataset> {
    if competitors.is_empty() {
        return None;
    }

    let mut counts: Vec<(String, u32)> = Vec::new();
    for c in competitors {
        match counts.iter_mut().find(|(industry, _)| *industry == c.industry) {
            Some((_, n)) => *n += 1,
            None => counts.push((c.industry.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(8);

    Some(ChartDataset {
        kind: ChartKind::Pie,
        title: "Competitor Industry Distribution".to_string(),
        labels: counts.iter().map(|(industry, _)| industry.clone()).collect(),
        series: vec![Series {
            label: None,
            values: counts.iter().map(|(_, n)| f64::from(*n)).collect(),
        }],
    })
}

/// Top-10 competitors by headcount, business first.
pub fn employee_comparison(
    business: &Business,
    competitors: &[Competitor],
) -> Option<ChartDataset> {
    let mut ranked: Vec<(&str, i32)> = competitors
        .iter()
        .filter_map(|c| c.employee_count.map(|n| (c.name.as_str(), n)))
        .collect();
    if ranked.is_empty() {
        return None;
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(10);
    if let Some(n) = business.employee_count {
        ranked.insert(0, (business.name.as_str(), n));
    }

    Some(ChartDataset {
        kind: ChartKind::Bar,
        title: "Employee Count Comparison".to_string(),
        labels: ranked.iter().map(|(name, _)| name.to_string()).collect(),
        series: vec![Series {
            label: Some("Employees".to_string()),
            values: ranked.iter().map(|(_, n)| f64::from(*n)).collect(),
        }],
    })
}

/// All applicable datasets for a business, in a stable order. `distances`
/// runs parallel to `competitors`.
pub fn report_analytics(
    business: &Business,
    competitors: &[Competitor],
    distances: &[Option<f64>],
) -> Vec<ChartDataset> {
    [
        market_share_distribution(business, competitors),
        revenue_comparison(business, competitors),
        distance_histogram(distances),
        threat_tier_distribution(competitors),
        employee_comparison(business, competitors),
        industry_distribution(competitors),
    ]
    .into_iter()
    .flatten()
    .collect()
}
