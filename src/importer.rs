//! Import pipeline: delimited text or JSON arrays into validated records.
//!
//! Imports are all-or-nothing. The first structural problem aborts the
//! whole import with an error naming the offending row; every accepted row
//! has passed through [`crate::validator::normalize`].

use serde_json::{Map, Value};
use std::path::Path;

use crate::errors::{CarverError, CarverResult};
use crate::models::{AssetRecord, RatingField, TextField};
use crate::validator::{normalize, restore};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Pick a format from a file name: JSON by MIME type, CSV otherwise.
    pub fn from_path(path: &Path) -> Self {
        match mime_guess::from_path(path).first_raw() {
            Some("application/json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportFormat::Csv => write!(f, "CSV"),
            ImportFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Parse `text` in the given format.
pub fn import(text: &str, format: ImportFormat) -> CarverResult<Vec<AssetRecord>> {
    let records = match format {
        ImportFormat::Csv => from_csv(text)?,
        ImportFormat::Json => from_json(text)?,
    };
    log::debug!("Imported {} records from {}", records.len(), format);
    Ok(records)
}

fn is_known_column(name: &str) -> bool {
    name == "id"
        || TextField::ALL.iter().any(|f| f.aliases().contains(&name))
        || RatingField::ALL.iter().any(|f| f.aliases().contains(&name))
}

/// Parse delimited text with a header row.
pub fn from_csv(text: &str) -> CarverResult<Vec<AssetRecord>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CarverError::parse("CSV", "header row", e.to_string()))?
        .clone();

    if !headers.iter().any(is_known_column) {
        log::warn!(
            "CSV header has no recognised columns ({}); every row will use defaults",
            headers.iter().collect::<Vec<_>>().join(",")
        );
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            let location = e
                .position()
                .map(|pos| format!("line {}", pos.line()))
                .unwrap_or_else(|| format!("row {}", index + 1));
            CarverError::parse("CSV", location, e.to_string())
        })?;

        let fields: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(normalize(&fields));
    }

    Ok(records)
}

/// Parse a JSON array of record objects.
pub fn from_json(text: &str) -> CarverResult<Vec<AssetRecord>> {
    parse_json_records(text, normalize)
}

/// Parse a persisted register. Stored text is restored verbatim.
pub fn from_stored_json(text: &str) -> CarverResult<Vec<AssetRecord>> {
    parse_json_records(text, restore)
}

fn parse_json_records(
    text: &str,
    build: fn(&Map<String, Value>) -> AssetRecord,
) -> CarverResult<Vec<AssetRecord>> {
    let document: Value = serde_json::from_str(text).map_err(|e| {
        CarverError::parse(
            "JSON",
            format!("line {} column {}", e.line(), e.column()),
            e.to_string(),
        )
    })?;

    let Value::Array(items) = document else {
        return Err(CarverError::parse(
            "JSON",
            "document root",
            "expected an array of asset records",
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(build(fields)),
            other => Err(CarverError::parse(
                "JSON",
                format!("record {}", index + 1),
                format!("expected an object, found {}", json_kind(other)),
            )),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_csv_import_with_short_headers() {
        let csv = "name,type,country,location,C,A,R,V,E,Rz,notes\n\
                   Depot,Logistics,Peru,Cajamarca,5,3,2,4,5,5,protest risk\n";
        let records = from_csv(csv).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.name, "Depot");
        assert_eq!(rec.asset_type, "Logistics");
        assert_eq!(rec.criticality, 5.0);
        assert_eq!(rec.recognizability, 5.0);
        assert_eq!(rec.notes, "protest risk");
    }

    #[test]
    fn test_csv_import_with_descriptive_headers() {
        let csv = "Name,Type,Country,Location,Criticality,Accessibility,Recuperability,Vulnerability,Effect,Recognizability,Notes\n\
                   Tower,Radar,Iraq,Nineveh,5,3,3,3,5,4,\n";
        let records = from_csv(csv).unwrap();
        assert_eq!(records[0].name, "Tower");
        assert_eq!(records[0].accessibility, 3.0);
        assert_eq!(records[0].recognizability, 4.0);
        assert_eq!(records[0].notes, "");
    }

    #[test]
    fn test_csv_import_clamps_and_defaults() {
        let csv = "name,C,A,R,V\n,0,6,abc,\n";
        let rec = &from_csv(csv).unwrap()[0];
        assert_eq!(rec.name, "Unnamed");
        assert_eq!(rec.asset_type, "Unknown");
        assert_eq!(rec.criticality, 1.0);
        assert_eq!(rec.accessibility, 5.0);
        assert_eq!(rec.recuperability, 1.0);
        assert_eq!(rec.vulnerability, 1.0);
        assert_eq!(rec.effect, 1.0);
    }

    #[test]
    fn test_csv_ragged_row_fails_fast() {
        let csv = "name,C,A\nfirst,1,2\nsecond,3\nthird,4,5\n";
        let err = from_csv(csv).unwrap_err();
        match err {
            CarverError::Parse { format, location, .. } => {
                assert_eq!(format, "CSV");
                assert_eq!(location, "line 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_csv_quoted_fields() {
        let csv = "name,notes\n\"Hub, North\",\"says \"\"hi\"\"\"\n";
        let rec = &from_csv(csv).unwrap()[0];
        assert_eq!(rec.name, "Hub, North");
        assert_eq!(rec.notes, "says \"hi\"");
    }

    #[test]
    fn test_json_import() {
        let json = r#"[{"id":"a1","name":"Hub","C":"4","Accessibility":2,"Rz":9}]"#;
        let records = from_json(json).unwrap();
        assert_eq!(records[0].id, "a1");
        assert_eq!(records[0].criticality, 4.0);
        assert_eq!(records[0].accessibility, 2.0);
        assert_eq!(records[0].recognizability, 5.0);
    }

    #[test]
    fn test_json_rejects_non_array() {
        let err = from_json(r#"{"name":"Hub"}"#).unwrap_err();
        assert!(err.to_string().contains("document root"));
    }

    #[test]
    fn test_json_rejects_non_object_record() {
        let err = from_json(r#"[{"name":"ok"}, 42]"#).unwrap_err();
        assert!(err.to_string().contains("record 2"));
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_json_syntax_error_reports_position() {
        let err = from_json("[{\"name\": }]").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImportFormat::from_path(&PathBuf::from("sites.json")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(&PathBuf::from("sites.csv")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(&PathBuf::from("sites")), ImportFormat::Csv);
    }
}
