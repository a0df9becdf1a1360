//! Scoring Module - CARVER risk derivation
//!
//! Split into submodules:
//! - `bucket`: heatmap grid coordinates and cell intensity
//!
//! Likelihood is the mean of Accessibility, Vulnerability and
//! Recognizability; Impact is the mean of Criticality, Effect and
//! Recuperability; the score is their product. Each mean is rounded to two
//! decimals before the product is taken, and the product is rounded again.

mod bucket;

pub use bucket::{bucket, CellIntensity};

use crate::models::{AssetRecord, DerivedMetrics, EnrichedRecord};

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean rounded to two decimals. `None` for an empty slice.
pub fn mean2(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(round2(sum / values.len() as f64))
}

/// Derive Likelihood, Impact and score for a record.
///
/// Pure: the result depends only on the six ratings, so it is recomputed on
/// every read instead of being stored next to the record.
pub fn derive(record: &AssetRecord) -> DerivedMetrics {
    let likelihood = round2(
        (record.accessibility + record.vulnerability + record.recognizability) / 3.0,
    );
    let impact = round2((record.criticality + record.effect + record.recuperability) / 3.0);
    DerivedMetrics {
        likelihood,
        impact,
        score: round2(likelihood * impact),
    }
}

/// Pair every record with its derived metrics, preserving input order.
pub fn enrich(records: &[AssetRecord]) -> Vec<EnrichedRecord> {
    records
        .iter()
        .map(|record| EnrichedRecord {
            record: record.clone(),
            derived: derive(record),
        })
        .collect()
}

/// Stable sort by score, highest first. Equal scores keep input order.
pub fn rank_by_score(enriched: &mut [EnrichedRecord]) {
    enriched.sort_by(|a, b| b.derived.score.total_cmp(&a.derived.score));
}

/// Portfolio-wide averages of the derived metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioSummary {
    pub asset_count: usize,
    pub avg_likelihood: f64,
    pub avg_impact: f64,
    pub avg_score: f64,
}

/// Averages across all records, or `None` when there is nothing to average.
pub fn portfolio_summary(enriched: &[EnrichedRecord]) -> Option<PortfolioSummary> {
    let likelihoods: Vec<f64> = enriched.iter().map(|r| r.derived.likelihood).collect();
    let impacts: Vec<f64> = enriched.iter().map(|r| r.derived.impact).collect();
    let scores: Vec<f64> = enriched.iter().map(|r| r.derived.score).collect();

    Some(PortfolioSummary {
        asset_count: enriched.len(),
        avg_likelihood: mean2(&likelihoods)?,
        avg_impact: mean2(&impacts)?,
        avg_score: mean2(&scores)?,
    })
}

/// Colour band for a single Likelihood or Impact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Low,
    Elevated,
    High,
}

impl ScoreBand {
    pub fn of(value: f64) -> Self {
        if value >= 4.0 {
            ScoreBand::High
        } else if value >= 3.0 {
            ScoreBand::Elevated
        } else {
            ScoreBand::Low
        }
    }
}

/// Count records per score band of their composite score:
/// (low `< 4`, moderate `< 9`, high `< 16`, critical).
pub fn calculate_risk_breakdown(enriched: &[EnrichedRecord]) -> (usize, usize, usize, usize) {
    let mut low = 0;
    let mut moderate = 0;
    let mut high = 0;
    let mut critical = 0;

    for record in enriched {
        match CellIntensity::of_score(record.derived.score) {
            CellIntensity::Low => low += 1,
            CellIntensity::Moderate => moderate += 1,
            CellIntensity::High => high += 1,
            CellIntensity::Critical => critical += 1,
        }
    }

    (low, moderate, high, critical)
}

/// Render a number the way the register displays it: integral values
/// without a fractional part, everything else in shortest decimal form.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}
