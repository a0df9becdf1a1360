use console::{measure_text_width, pad_str, style, truncate_str, Alignment, Term};

use crate::heatmap::{Heatmap, HeatmapCell};
use crate::scoring::{format_number, CellIntensity, PortfolioSummary, ScoreBand};
use crate::selftest::SelfTestReport;
use crate::views::{CellValue, Column, TableView};

/// Widest a text cell may grow before it is truncated.
const MAX_TEXT_WIDTH: usize = 40;
const HEATMAP_CELL_WIDTH: usize = 22;

/// Terminal rendering of the register, heatmap and diagnostics.
pub struct TerminalRenderer {
    term: Term,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn print(&self, text: &str) -> std::io::Result<()> {
        for line in text.lines() {
            self.term.write_line(line)?;
        }
        Ok(())
    }

    fn styled_number(column: Column, value: f64) -> String {
        let text = format_number(value);
        match column {
            Column::Likelihood | Column::Impact => match ScoreBand::of(value) {
                ScoreBand::High => style(text).red().bold().to_string(),
                ScoreBand::Elevated => style(text).yellow().to_string(),
                ScoreBand::Low => style(text).green().to_string(),
            },
            Column::Score => style(text).white().bold().to_string(),
            _ => text,
        }
    }

    /// Render the table with aligned columns.
    pub fn render_table(&self, view: &TableView) -> String {
        let cells: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|row| {
                view.columns
                    .iter()
                    .map(|column| match column.value(row) {
                        CellValue::Text(text) => {
                            truncate_str(text, MAX_TEXT_WIDTH, "…").into_owned()
                        }
                        CellValue::Number(n) => Self::styled_number(*column, n),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = view
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                cells
                    .iter()
                    .map(|row| measure_text_width(&row[idx]))
                    .chain(std::iter::once(column.label().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = Vec::new();
        out.push(format!(
            "{} {} ({} assets)",
            style("Role:").dim(),
            style(view.role).cyan().bold(),
            view.rows.len()
        ));

        let header: Vec<String> = view
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                style(pad_str(column.label(), *width, Alignment::Left, None).into_owned())
                    .bold()
                    .to_string()
            })
            .collect();
        out.push(header.join("  "));

        for (row, record) in cells.iter().zip(&view.rows) {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
                .collect();
            out.push(format!("{}  {}", line.join("  "), style(&record.record.id).dim()));
        }

        out.join("\n")
    }

    fn cell_style(cell: &HeatmapCell, text: String) -> String {
        match cell.intensity() {
            CellIntensity::Critical => style(text).on_red().white().to_string(),
            CellIntensity::High => style(text).on_yellow().black().to_string(),
            CellIntensity::Moderate => style(text).yellow().to_string(),
            CellIntensity::Low => style(text).green().to_string(),
        }
    }

    fn cell_text(cell: &HeatmapCell) -> String {
        if cell.count() == 0 {
            return "·".to_string();
        }
        let mut text = format!("{}: {}", cell.count(), cell.preview().join(", "));
        if cell.overflow() > 0 {
            text.push_str(&format!(" +{} more", cell.overflow()));
        }
        text
    }

    /// Render the 5×5 grid, impact rows from high to low.
    pub fn render_heatmap(&self, heatmap: &Heatmap) -> String {
        let mut out = Vec::new();
        let axis: Vec<String> = (1..=5)
            .map(|l| {
                pad_str(&format!("L{}", l), HEATMAP_CELL_WIDTH, Alignment::Center, None)
                    .into_owned()
            })
            .collect();
        out.push(format!("     {}", axis.join(" ")));

        for row in heatmap.rows() {
            let impact = row.first().map(|c| c.impact).unwrap_or_default();
            let cells: Vec<String> = row
                .iter()
                .map(|cell| {
                    let raw = Self::cell_text(cell);
                    let text = truncate_str(&raw, HEATMAP_CELL_WIDTH, "…");
                    let padded =
                        pad_str(&text, HEATMAP_CELL_WIDTH, Alignment::Left, None).into_owned();
                    Self::cell_style(cell, padded)
                })
                .collect();
            out.push(format!("  I{} {}", impact, cells.join(" ")));
        }

        out.push(format!(
            "     {} {}",
            style("Likelihood →  Impact ↑").dim(),
            style(format!("({} assets)", heatmap.total())).dim()
        ));
        out.join("\n")
    }

    pub fn render_summary(
        &self,
        summary: Option<&PortfolioSummary>,
        breakdown: (usize, usize, usize, usize),
    ) -> String {
        let Some(summary) = summary else {
            return style("No assets in register").dim().to_string();
        };
        let (low, moderate, high, critical) = breakdown;
        [
            format!("   Assets: {}", style(summary.asset_count).white().bold()),
            format!("   Average Likelihood: {:.2}", summary.avg_likelihood),
            format!("   Average Impact: {:.2}", summary.avg_impact),
            format!(
                "   Average Risk (L×I): {}",
                style(format!("{:.2}", summary.avg_score)).bold()
            ),
            format!(
                "   Bands: {} low, {} moderate, {} high, {} critical",
                style(low).green(),
                style(moderate).yellow(),
                style(high).yellow().bold(),
                style(critical).red().bold()
            ),
        ]
        .join("\n")
    }

    pub fn render_self_tests(&self, report: &SelfTestReport) -> String {
        let mut out: Vec<String> = report
            .messages
            .iter()
            .map(|m| format!("   {}", m))
            .collect();
        let verdict = if report.ok {
            style("Self-tests OK").green().bold()
        } else {
            style("Self-tests Failed").red().bold()
        };
        out.push(verdict.to_string());
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetRecord;
    use crate::sample::sample_records;
    use crate::scoring::enrich;
    use crate::views::{build_table, Role, RowFilterPolicy, TableQuery};
    use console::strip_ansi_codes;

    #[test]
    fn test_render_table_uses_role_columns() {
        let view = build_table(
            enrich(&sample_records()),
            Role::Comms,
            RowFilterPolicy::ColumnsOnly,
            &TableQuery::default(),
        );
        let text = TerminalRenderer::new().render_table(&view);
        let plain = strip_ansi_codes(&text);
        let header = plain.lines().nth(1).unwrap();
        assert!(header.starts_with("Asset"));
        assert!(header.contains("Risk"));
        assert!(!header.contains("Type"));
        assert!(plain.contains("Kivu Ridge VHF Site"));
        assert_eq!(plain.lines().count(), 2 + 5);
    }

    #[test]
    fn test_render_heatmap_shows_overflow() {
        let records: Vec<AssetRecord> = (0..5)
            .map(|i| AssetRecord::new(format!("id-{i}"), format!("a{i}")))
            .collect();
        let heatmap = Heatmap::build(&enrich(&records));
        let text = TerminalRenderer::new().render_heatmap(&heatmap);
        let plain = strip_ansi_codes(&text);
        assert!(plain.contains("5: a0, a1, a2 +2 more") || plain.contains("5: a0, a1, a2 +2…"));
        assert!(plain.contains("(5 assets)"));
        let rows: Vec<&str> = plain.lines().filter(|l| l.trim_start().starts_with('I')).collect();
        assert!(rows[0].trim_start().starts_with("I5"));
        assert!(rows[4].trim_start().starts_with("I1"));
    }

    #[test]
    fn test_render_summary_empty() {
        let text = TerminalRenderer::new().render_summary(None, (0, 0, 0, 0));
        assert!(strip_ansi_codes(&text).contains("No assets"));
    }
}
