use crate::errors::{CarverError, CarverResult};
use crate::models::AssetRecord;
use crate::scoring::{derive, enrich, format_number};

/// Column order of the delimited-text export.
pub const EXPORT_FIELDS: [&str; 14] = [
    "name", "type", "country", "location", "C", "A", "R", "V", "E", "Rz", "L", "I", "score",
    "notes",
];

pub struct CsvExporter;

impl CsvExporter {
    /// Serialize records with freshly derived L, I and score columns.
    /// Fields containing the delimiter, quotes or newlines are quoted.
    pub fn export(records: &[AssetRecord]) -> CarverResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(EXPORT_FIELDS)?;

        for record in records {
            let derived = derive(record);
            writer.write_record([
                record.name.clone(),
                record.asset_type.clone(),
                record.country.clone(),
                record.location.clone(),
                format_number(record.criticality),
                format_number(record.accessibility),
                format_number(record.recuperability),
                format_number(record.vulnerability),
                format_number(record.effect),
                format_number(record.recognizability),
                format_number(derived.likelihood),
                format_number(derived.impact),
                format_number(derived.score),
                record.notes.clone(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CarverError::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct JsonExporter;

impl JsonExporter {
    /// Pretty-printed array of records including derived fields.
    pub fn export(records: &[AssetRecord]) -> CarverResult<String> {
        Ok(serde_json::to_string_pretty(&enrich(records))?)
    }

    /// Compact array of records without derived fields, as persisted.
    pub fn export_rows(records: &[AssetRecord]) -> CarverResult<String> {
        Ok(serde_json::to_string(records)?)
    }
}
