use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::CarverError;

/// A single site or asset under assessment.
///
/// Ratings are stored as `f64` so that fractional input survives import
/// untouched; the validator guarantees every rating lies in `[1, 5]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub country: String,
    pub location: String,

    // CARVER ratings
    #[serde(rename = "C")]
    pub criticality: f64,
    #[serde(rename = "A")]
    pub accessibility: f64,
    #[serde(rename = "R")]
    pub recuperability: f64,
    #[serde(rename = "V")]
    pub vulnerability: f64,
    #[serde(rename = "E")]
    pub effect: f64,
    #[serde(rename = "Rz")]
    pub recognizability: f64,

    pub notes: String,
}

impl AssetRecord {
    /// Blank asset as created by the "add" action: every rating at the
    /// midpoint, type at its import default, other text empty.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            asset_type: TextField::Type.default_value().to_string(),
            country: String::new(),
            location: String::new(),
            criticality: 3.0,
            accessibility: 3.0,
            recuperability: 3.0,
            vulnerability: 3.0,
            effect: 3.0,
            recognizability: 3.0,
            notes: String::new(),
        }
    }

    pub fn rating(&self, field: RatingField) -> f64 {
        match field {
            RatingField::Criticality => self.criticality,
            RatingField::Accessibility => self.accessibility,
            RatingField::Recuperability => self.recuperability,
            RatingField::Vulnerability => self.vulnerability,
            RatingField::Effect => self.effect,
            RatingField::Recognizability => self.recognizability,
        }
    }

    /// Stores `value` as-is. Callers go through the validator first.
    pub fn set_rating(&mut self, field: RatingField, value: f64) {
        let slot = match field {
            RatingField::Criticality => &mut self.criticality,
            RatingField::Accessibility => &mut self.accessibility,
            RatingField::Recuperability => &mut self.recuperability,
            RatingField::Vulnerability => &mut self.vulnerability,
            RatingField::Effect => &mut self.effect,
            RatingField::Recognizability => &mut self.recognizability,
        };
        *slot = value;
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Type => &self.asset_type,
            TextField::Country => &self.country,
            TextField::Location => &self.location,
            TextField::Notes => &self.notes,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: String) {
        match field {
            TextField::Name => self.name = value,
            TextField::Type => self.asset_type = value,
            TextField::Country => self.country = value,
            TextField::Location => self.location = value,
            TextField::Notes => self.notes = value,
        }
    }
}

/// The six CARVER factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingField {
    Criticality,
    Accessibility,
    Recuperability,
    Vulnerability,
    Effect,
    Recognizability,
}

impl RatingField {
    /// Register order: C, A, R, V, E, Rz.
    pub const ALL: [RatingField; 6] = [
        RatingField::Criticality,
        RatingField::Accessibility,
        RatingField::Recuperability,
        RatingField::Vulnerability,
        RatingField::Effect,
        RatingField::Recognizability,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RatingField::Criticality => "C",
            RatingField::Accessibility => "A",
            RatingField::Recuperability => "R",
            RatingField::Vulnerability => "V",
            RatingField::Effect => "E",
            RatingField::Recognizability => "Rz",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingField::Criticality => "Criticality",
            RatingField::Accessibility => "Accessibility",
            RatingField::Recuperability => "Recuperability",
            RatingField::Vulnerability => "Vulnerability",
            RatingField::Effect => "Effect",
            RatingField::Recognizability => "Recognizability",
        }
    }

    /// Accepted input names, in lookup priority order.
    pub fn aliases(self) -> [&'static str; 2] {
        [self.code(), self.label()]
    }
}

/// Free-text fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Type,
    Country,
    Location,
    Notes,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Name,
        TextField::Type,
        TextField::Country,
        TextField::Location,
        TextField::Notes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Type => "type",
            TextField::Country => "country",
            TextField::Location => "location",
            TextField::Notes => "notes",
        }
    }

    /// Accepted input names, in lookup priority order.
    pub fn aliases(self) -> [&'static str; 2] {
        match self {
            TextField::Name => ["name", "Name"],
            TextField::Type => ["type", "Type"],
            TextField::Country => ["country", "Country"],
            TextField::Location => ["location", "Location"],
            TextField::Notes => ["notes", "Notes"],
        }
    }

    /// Value substituted when the input leaves the field absent or empty.
    pub fn default_value(self) -> &'static str {
        match self {
            TextField::Name => "Unnamed",
            TextField::Type => "Unknown",
            TextField::Country | TextField::Location | TextField::Notes => "",
        }
    }
}

/// Any editable field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Text(TextField),
    Rating(RatingField),
}

impl FromStr for RecordField {
    type Err = CarverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(field) = TextField::ALL
            .iter()
            .find(|f| f.aliases().iter().any(|a| a.eq_ignore_ascii_case(s)))
        {
            return Ok(RecordField::Text(*field));
        }
        // Short codes match case-sensitively, labels do not
        if let Some(field) = RatingField::ALL.iter().find(|f| {
            f.code() == s || f.label().eq_ignore_ascii_case(s)
        }) {
            return Ok(RecordField::Rating(*field));
        }
        Err(CarverError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordField::Text(field) => write!(f, "{}", field.key()),
            RecordField::Rating(field) => write!(f, "{}", field.code()),
        }
    }
}

/// Likelihood, Impact and composite score computed from the six ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    #[serde(rename = "L")]
    pub likelihood: f64,
    #[serde(rename = "I")]
    pub impact: f64,
    pub score: f64,
}

/// A record together with freshly derived metrics. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: AssetRecord,
    #[serde(flatten)]
    pub derived: DerivedMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_uses_midpoint_ratings() {
        let record = AssetRecord::new("id-1".into(), "New Asset".into());
        for field in RatingField::ALL {
            assert_eq!(record.rating(field), 3.0);
        }
        assert_eq!(record.asset_type, "Unknown");
        assert!(record.country.is_empty());
    }

    #[test]
    fn test_set_rating_targets_single_field() {
        let mut record = AssetRecord::new("id-1".into(), "x".into());
        record.set_rating(RatingField::Recognizability, 5.0);
        assert_eq!(record.recognizability, 5.0);
        assert_eq!(record.recuperability, 3.0);
    }

    #[test]
    fn test_record_field_parsing() {
        assert_eq!(
            "R".parse::<RecordField>().unwrap(),
            RecordField::Rating(RatingField::Recuperability)
        );
        assert_eq!(
            "Rz".parse::<RecordField>().unwrap(),
            RecordField::Rating(RatingField::Recognizability)
        );
        assert_eq!(
            "criticality".parse::<RecordField>().unwrap(),
            RecordField::Rating(RatingField::Criticality)
        );
        assert_eq!(
            "Notes".parse::<RecordField>().unwrap(),
            RecordField::Text(TextField::Notes)
        );
        assert!("score".parse::<RecordField>().is_err());
    }

    #[test]
    fn test_enriched_record_serializes_flat() {
        let enriched = EnrichedRecord {
            record: AssetRecord::new("id-1".into(), "Depot".into()),
            derived: DerivedMetrics {
                likelihood: 3.0,
                impact: 3.0,
                score: 9.0,
            },
        };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["name"], "Depot");
        assert_eq!(value["type"], "");
        assert_eq!(value["Rz"], 3.0);
        assert_eq!(value["score"], 9.0);
        assert!(value.get("record").is_none());
    }
}
