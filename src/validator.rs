//! Record validation and normalization.
//!
//! Turns an arbitrary field map (a parsed CSV row, a JSON object, a stored
//! row) into a well-formed [`AssetRecord`]. The transformation is total:
//! malformed values are clamped or defaulted, never reported.

use serde_json::{Map, Value};

use crate::models::{AssetRecord, RatingField, TextField};

pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;

/// Fresh opaque record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Clamp a parsed rating into `[1, 5]`. NaN becomes the floor.
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        return RATING_MIN;
    }
    value.clamp(RATING_MIN, RATING_MAX)
}

/// Parse free text as a rating: numeric text is clamped, anything else is `1`.
pub fn parse_rating(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return RATING_MIN;
    }
    trimmed.parse::<f64>().map(clamp_rating).unwrap_or(RATING_MIN)
}

/// Coerce an optional JSON value to a rating.
pub fn coerce_rating(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(clamp_rating).unwrap_or(RATING_MIN),
        Some(Value::String(s)) => parse_rating(s),
        _ => RATING_MIN,
    }
}

/// First alias whose value is present and non-empty.
fn lookup<'a>(raw: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| raw.get(*alias))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text as it will be stored: empty input takes the field's default.
pub fn normalize_text(field: TextField, value: &str) -> String {
    if value.is_empty() {
        field.default_value().to_string()
    } else {
        value.to_string()
    }
}

/// Build a record from a field map.
///
/// Text fields fall back to their defaults, ratings are coerced and clamped.
/// A supplied `id` is kept; otherwise a new one is generated.
pub fn normalize(raw: &Map<String, Value>) -> AssetRecord {
    let id = lookup(raw, &["id"])
        .map(text_of)
        .unwrap_or_else(new_id);

    let text = |field: TextField| {
        lookup(raw, &field.aliases())
            .map(text_of)
            .unwrap_or_else(|| field.default_value().to_string())
    };
    let rating = |field: RatingField| coerce_rating(lookup(raw, &field.aliases()));

    AssetRecord {
        id,
        name: text(TextField::Name),
        asset_type: text(TextField::Type),
        country: text(TextField::Country),
        location: text(TextField::Location),
        criticality: rating(RatingField::Criticality),
        accessibility: rating(RatingField::Accessibility),
        recuperability: rating(RatingField::Recuperability),
        vulnerability: rating(RatingField::Vulnerability),
        effect: rating(RatingField::Effect),
        recognizability: rating(RatingField::Recognizability),
        notes: text(TextField::Notes),
    }
}

/// Rebuild a persisted record. Text present in the map is kept verbatim,
/// even when empty; ratings are still clamped.
pub fn restore(raw: &Map<String, Value>) -> AssetRecord {
    let mut record = normalize(raw);
    for field in TextField::ALL {
        if let Some(Value::String(s)) = raw.get(field.key()) {
            record.set_text(field, s.clone());
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_clamping_rules() {
        let raw = map(json!({"C": 0, "A": 6, "R": "abc", "V": "4", "E": -3}));
        let rec = normalize(&raw);
        assert_eq!(rec.criticality, 1.0);
        assert_eq!(rec.accessibility, 5.0);
        assert_eq!(rec.recuperability, 1.0);
        assert_eq!(rec.vulnerability, 4.0);
        assert_eq!(rec.effect, 1.0);
        // absent
        assert_eq!(rec.recognizability, 1.0);
    }

    #[test]
    fn test_fractional_rating_kept() {
        let rec = normalize(&map(json!({"C": 2.5, "A": "3.25"})));
        assert_eq!(rec.criticality, 2.5);
        assert_eq!(rec.accessibility, 3.25);
    }

    #[test]
    fn test_text_defaults() {
        let rec = normalize(&map(json!({"name": "", "country": null})));
        assert_eq!(rec.name, "Unnamed");
        assert_eq!(rec.asset_type, "Unknown");
        assert_eq!(rec.country, "");
        assert_eq!(rec.location, "");
        assert_eq!(rec.notes, "");
    }

    #[test]
    fn test_alias_resolution_prefers_short_code() {
        let rec = normalize(&map(json!({
            "C": 4, "Criticality": 2,
            "Accessibility": 5,
            "Name": "Depot", "name": "Primary"
        })));
        assert_eq!(rec.criticality, 4.0);
        assert_eq!(rec.accessibility, 5.0);
        assert_eq!(rec.name, "Primary");
    }

    #[test]
    fn test_empty_short_code_falls_through_to_alias() {
        let rec = normalize(&map(json!({"C": "", "Criticality": "5"})));
        assert_eq!(rec.criticality, 5.0);
    }

    #[test]
    fn test_id_preserved_or_generated() {
        let kept = normalize(&map(json!({"id": "asset-7"})));
        assert_eq!(kept.id, "asset-7");

        let a = normalize(&map(json!({})));
        let b = normalize(&map(json!({})));
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_parse_rating_text() {
        assert_eq!(parse_rating(" 4 "), 4.0);
        assert_eq!(parse_rating("9"), 5.0);
        assert_eq!(parse_rating("NaN"), 1.0);
        assert_eq!(parse_rating(""), 1.0);
        assert_eq!(parse_rating("three"), 1.0);
    }

    #[test]
    fn test_non_numeric_json_values() {
        assert_eq!(coerce_rating(Some(&json!(true))), 1.0);
        assert_eq!(coerce_rating(Some(&json!([3]))), 1.0);
        assert_eq!(coerce_rating(None), 1.0);
    }

    #[test]
    fn test_normalize_text_defaults_empty_input() {
        assert_eq!(normalize_text(TextField::Name, ""), "Unnamed");
        assert_eq!(normalize_text(TextField::Type, ""), "Unknown");
        assert_eq!(normalize_text(TextField::Notes, ""), "");
        assert_eq!(normalize_text(TextField::Name, " Depot "), " Depot ");
    }

    #[test]
    fn test_restore_keeps_empty_text() {
        let rec = restore(&map(json!({
            "id": "asset-1", "name": "", "type": "", "C": 7, "Rz": 2.5
        })));
        assert_eq!(rec.id, "asset-1");
        assert_eq!(rec.name, "");
        assert_eq!(rec.asset_type, "");
        assert_eq!(rec.criticality, 5.0);
        assert_eq!(rec.recognizability, 2.5);

        // absent text still defaults
        let rec = restore(&map(json!({"id": "asset-2"})));
        assert_eq!(rec.name, "Unnamed");
        assert_eq!(rec.asset_type, "Unknown");
    }
}
