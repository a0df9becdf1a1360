//! Heatmap bucketing
//!
//! Continuous Likelihood/Impact values are snapped to the 1..=5 grid.

/// Snap a value to an integer grid coordinate in `[1, 5]`.
///
/// Halves round away from zero (`3.5 -> 4`), then the result is clamped.
/// NaN lands in the lowest bucket.
pub fn bucket(value: f64) -> u8 {
    if value.is_nan() {
        return 1;
    }
    value.round().clamp(1.0, 5.0) as u8
}

/// Tint of a heatmap cell, from the product of its grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellIntensity {
    Low,
    Moderate,
    High,
    Critical,
}

impl CellIntensity {
    /// Intensity of the cell at (`impact`, `likelihood`).
    pub fn of_cell(impact: u8, likelihood: u8) -> Self {
        Self::of_score(f64::from(impact) * f64::from(likelihood))
    }

    pub fn of_score(score: f64) -> Self {
        if score >= 16.0 {
            CellIntensity::Critical
        } else if score >= 9.0 {
            CellIntensity::High
        } else if score >= 4.0 {
            CellIntensity::Moderate
        } else {
            CellIntensity::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CellIntensity::Low => "LOW",
            CellIntensity::Moderate => "MODERATE",
            CellIntensity::High => "HIGH",
            CellIntensity::Critical => "CRITICAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_rounding_and_clamping() {
        assert_eq!(bucket(3.5), 4);
        assert_eq!(bucket(-1.0), 1);
        assert_eq!(bucket(5.6), 5);
        assert_eq!(bucket(2.33), 2);
        assert_eq!(bucket(2.67), 3);
        assert_eq!(bucket(2.5), 3);
        assert_eq!(bucket(0.4), 1);
    }

    #[test]
    fn test_bucket_nan() {
        assert_eq!(bucket(f64::NAN), 1);
        assert_eq!(bucket(f64::INFINITY), 5);
    }

    #[test]
    fn test_cell_intensity() {
        assert_eq!(CellIntensity::of_cell(5, 5), CellIntensity::Critical);
        assert_eq!(CellIntensity::of_cell(4, 4), CellIntensity::Critical);
        assert_eq!(CellIntensity::of_cell(3, 3), CellIntensity::High);
        assert_eq!(CellIntensity::of_cell(2, 2), CellIntensity::Moderate);
        assert_eq!(CellIntensity::of_cell(1, 3), CellIntensity::Low);
    }
}
