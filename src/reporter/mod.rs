use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

use crate::errors::{CarverError, CarverResult};
use crate::models::{AssetRecord, EnrichedRecord};
use crate::scoring::{enrich, format_number, portfolio_summary, rank_by_score};

pub const REPORT_TITLE: &str = "# OODA–CARVER Risk Report";
pub const NO_DATA: &str = "_No assets in register._";
pub const METHOD_FOOTER: &str =
    "_Method: L = avg(A,V,Rz); I = avg(C,E,R); Risk = L×I. Scale 1–5._";

const TOP_N: usize = 3;

/// Markdown report generator for the asset register.
/// Output is deterministic for a given input and timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter instance.
    pub fn new() -> Self {
        Self
    }

    pub fn generate_report(&self, records: &[AssetRecord], path: &Path) -> CarverResult<()> {
        let markdown = self.build_report(records);
        std::fs::write(path, markdown).map_err(|e| CarverError::io(e, path.to_path_buf()))?;
        log::info!("Markdown report generated: {}", path.display());
        Ok(())
    }

    /// Build the report stamped with the current time.
    pub fn build_report(&self, records: &[AssetRecord]) -> String {
        self.build_report_at(records, Utc::now())
    }

    pub fn build_report_at(&self, records: &[AssetRecord], generated_at: DateTime<Utc>) -> String {
        let mut ranked = enrich(records);
        rank_by_score(&mut ranked);

        let mut lines = vec![
            REPORT_TITLE.to_string(),
            format!(
                "_Generated: {}_",
                generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            String::new(),
        ];

        self.push_summary(&mut lines, &ranked);
        lines.push(String::new());
        self.push_top_risks(&mut lines, &ranked);
        lines.push(String::new());
        self.push_register(&mut lines, &ranked);
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(METHOD_FOOTER.to_string());

        lines.join("\n")
    }

    fn push_summary(&self, lines: &mut Vec<String>, ranked: &[EnrichedRecord]) {
        lines.push("## Portfolio Summary".to_string());
        match portfolio_summary(ranked) {
            Some(summary) => {
                lines.push(format!("* Assets: {}", summary.asset_count));
                lines.push(format!("* Average Likelihood: {:.2}", summary.avg_likelihood));
                lines.push(format!("* Average Impact: {:.2}", summary.avg_impact));
                lines.push(format!("* Average Risk (L×I): {:.2}", summary.avg_score));
            }
            None => lines.push(NO_DATA.to_string()),
        }
    }

    fn push_top_risks(&self, lines: &mut Vec<String>, ranked: &[EnrichedRecord]) {
        lines.push(format!("## Top {} Risks", TOP_N));
        if ranked.is_empty() {
            lines.push(NO_DATA.to_string());
            return;
        }
        for (idx, entry) in ranked.iter().take(TOP_N).enumerate() {
            let r = &entry.record;
            let d = &entry.derived;
            let notes = if r.notes.is_empty() { "—" } else { r.notes.as_str() };
            lines.push(format!(
                "{}. **{}** ({}, {}) — Risk: {}  \n    L={} (A={}, V={}, Rz={}); I={} (C={}, E={}, R={})  \n    Notes: {}",
                idx + 1,
                r.name,
                r.asset_type,
                r.country,
                format_number(d.score),
                format_number(d.likelihood),
                format_number(r.accessibility),
                format_number(r.vulnerability),
                format_number(r.recognizability),
                format_number(d.impact),
                format_number(r.criticality),
                format_number(r.effect),
                format_number(r.recuperability),
                notes,
            ));
        }
    }

    fn push_register(&self, lines: &mut Vec<String>, ranked: &[EnrichedRecord]) {
        lines.push("## Full Register".to_string());
        if ranked.is_empty() {
            lines.push(NO_DATA.to_string());
            return;
        }
        lines.push(
            "| Asset | Type | Ctry | Loc | C | A | R | V | E | Rz | L | I | Risk | Notes |"
                .to_string(),
        );
        lines.push(
            "|---|---|---|---|---:|---:|---:|---:|---:|---:|---:|---:|---:|---|".to_string(),
        );
        for entry in ranked {
            let r = &entry.record;
            let d = &entry.derived;
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                Self::escape_cell(&r.name),
                Self::escape_cell(&r.asset_type),
                Self::escape_cell(&r.country),
                Self::escape_cell(&r.location),
                format_number(r.criticality),
                format_number(r.accessibility),
                format_number(r.recuperability),
                format_number(r.vulnerability),
                format_number(r.effect),
                format_number(r.recognizability),
                format_number(d.likelihood),
                format_number(d.impact),
                format_number(d.score),
                Self::escape_cell(&r.notes),
            ));
        }
    }

    /// Keep a value inside a single table cell.
    fn escape_cell(s: &str) -> String {
        s.replace('|', "/").replace(&['\r', '\n'][..], " ")
    }
}
