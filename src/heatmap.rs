//! 5×5 Likelihood × Impact heatmap model.
//!
//! Records are placed by bucketing their derived metrics. Cells keep every
//! member; renderers show a short preview plus an overflow count.

use crate::models::EnrichedRecord;
use crate::scoring::{bucket, CellIntensity};

pub const GRID_SIZE: u8 = 5;
/// Names shown per cell before collapsing into "+N more".
pub const PREVIEW_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct HeatmapCell {
    pub impact: u8,
    pub likelihood: u8,
    pub members: Vec<EnrichedRecord>,
}

impl HeatmapCell {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn preview(&self) -> Vec<&str> {
        self.members
            .iter()
            .take(PREVIEW_LEN)
            .map(|m| m.record.name.as_str())
            .collect()
    }

    /// Members not covered by the preview.
    pub fn overflow(&self) -> usize {
        self.members.len().saturating_sub(PREVIEW_LEN)
    }

    pub fn intensity(&self) -> CellIntensity {
        CellIntensity::of_cell(self.impact, self.likelihood)
    }
}

#[derive(Debug, Clone)]
pub struct Heatmap {
    // Row-major by impact then likelihood, both starting at 1
    cells: Vec<HeatmapCell>,
}

impl Heatmap {
    pub fn build(enriched: &[EnrichedRecord]) -> Self {
        let mut cells: Vec<HeatmapCell> = (1..=GRID_SIZE)
            .flat_map(|impact| {
                (1..=GRID_SIZE).map(move |likelihood| HeatmapCell {
                    impact,
                    likelihood,
                    members: Vec::new(),
                })
            })
            .collect();

        for record in enriched {
            let impact = bucket(record.derived.impact);
            let likelihood = bucket(record.derived.likelihood);
            cells[Self::index(impact, likelihood)].members.push(record.clone());
        }

        Self { cells }
    }

    fn index(impact: u8, likelihood: u8) -> usize {
        usize::from(impact - 1) * usize::from(GRID_SIZE) + usize::from(likelihood - 1)
    }

    /// Cell at grid coordinates, both in `1..=5`.
    pub fn cell(&self, impact: u8, likelihood: u8) -> Option<&HeatmapCell> {
        if !(1..=GRID_SIZE).contains(&impact) || !(1..=GRID_SIZE).contains(&likelihood) {
            return None;
        }
        self.cells.get(Self::index(impact, likelihood))
    }

    /// Display rows: impact from 5 down to 1, each with likelihood 1 to 5.
    pub fn rows(&self) -> impl Iterator<Item = &[HeatmapCell]> {
        self.cells.chunks(usize::from(GRID_SIZE)).rev()
    }

    /// Number of placed records; always equals the input length.
    pub fn total(&self) -> usize {
        self.cells.iter().map(HeatmapCell::count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetRecord, RatingField};
    use crate::scoring::enrich;

    fn asset(name: &str, likelihood: f64, impact: f64) -> AssetRecord {
        let mut rec = AssetRecord::new(format!("id-{name}"), name.to_string());
        rec.set_rating(RatingField::Accessibility, likelihood);
        rec.set_rating(RatingField::Vulnerability, likelihood);
        rec.set_rating(RatingField::Recognizability, likelihood);
        rec.set_rating(RatingField::Criticality, impact);
        rec.set_rating(RatingField::Effect, impact);
        rec.set_rating(RatingField::Recuperability, impact);
        rec
    }

    #[test]
    fn test_placement() {
        let heatmap = Heatmap::build(&enrich(&[asset("a", 2.0, 5.0)]));
        let cell = heatmap.cell(5, 2).unwrap();
        assert_eq!(cell.count(), 1);
        assert_eq!(cell.preview(), vec!["a"]);
        assert_eq!(heatmap.cell(2, 5).unwrap().count(), 0);
    }

    #[test]
    fn test_shared_cell_preview_and_overflow() {
        let records: Vec<AssetRecord> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| asset(n, 4.0, 4.0))
            .collect();
        let heatmap = Heatmap::build(&enrich(&records));
        let cell = heatmap.cell(4, 4).unwrap();
        assert_eq!(cell.count(), 5);
        assert_eq!(cell.preview(), vec!["a", "b", "c"]);
        assert_eq!(cell.overflow(), 2);
        assert_eq!(cell.intensity(), CellIntensity::Critical);
        assert_eq!(heatmap.total(), 5);
    }

    #[test]
    fn test_rows_run_high_impact_first() {
        let heatmap = Heatmap::build(&[]);
        let rows: Vec<&[HeatmapCell]> = heatmap.rows().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0][0].impact, 5);
        assert_eq!(rows[4][0].impact, 1);
        assert_eq!(rows[0][0].likelihood, 1);
        assert_eq!(rows[0][4].likelihood, 5);
        assert_eq!(heatmap.total(), 0);
    }

    #[test]
    fn test_out_of_grid_lookup() {
        let heatmap = Heatmap::build(&[]);
        assert!(heatmap.cell(0, 1).is_none());
        assert!(heatmap.cell(1, 6).is_none());
    }
}
