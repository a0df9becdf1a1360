//! Built-in sanity checks for the scoring and export pipeline, runnable
//! from the CLI against the installed binary.

use crate::exporter::CsvExporter;
use crate::importer::from_csv;
use crate::models::AssetRecord;
use crate::reporter::{MarkdownReporter, REPORT_TITLE};
use crate::scoring::derive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestReport {
    pub ok: bool,
    pub messages: Vec<String>,
}

fn reference_record() -> AssetRecord {
    let mut rec = AssetRecord::new("self-test".into(), "A".into());
    rec.asset_type = "t".into();
    rec.country = "c".into();
    rec.location = "l".into();
    rec.criticality = 1.0;
    rec.accessibility = 2.0;
    rec.recuperability = 3.0;
    rec.vulnerability = 4.0;
    rec.effect = 5.0;
    rec.recognizability = 1.0;
    rec.notes = "n".into();
    rec
}

fn check_derivation() -> Result<(), String> {
    let mut top = reference_record();
    for field in crate::models::RatingField::ALL {
        top.set_rating(field, 5.0);
    }
    let d = derive(&top);
    if d.likelihood == 5.0 && d.impact == 5.0 && d.score == 25.0 {
        Ok(())
    } else {
        Err(format!("expected L=5, I=5, score=25 for all 5s, got {:?}", d))
    }
}

fn check_csv_round_trip() -> Result<(), String> {
    let csv = CsvExporter::export(&[reference_record()]).map_err(|e| e.to_string())?;
    let parsed = from_csv(&csv).map_err(|e| e.to_string())?;
    match parsed.as_slice() {
        [only] if only.name == "A" && only.notes == "n" => Ok(()),
        _ => Err(format!("round trip produced {} records", parsed.len())),
    }
}

fn check_report_title() -> Result<(), String> {
    let report = MarkdownReporter::new().build_report(&[reference_record()]);
    if report.contains(REPORT_TITLE) {
        Ok(())
    } else {
        Err("report title missing".to_string())
    }
}

/// Run every check, collecting one message per check.
pub fn run_self_tests() -> SelfTestReport {
    let checks: [(&str, fn() -> Result<(), String>); 3] = [
        ("derivation", check_derivation),
        ("CSV round trip", check_csv_round_trip),
        ("Markdown report", check_report_title),
    ];

    let mut ok = true;
    let mut messages = Vec::new();
    for (name, check) in checks {
        match check() {
            Ok(()) => messages.push(format!("{} ✅", name)),
            Err(e) => {
                log::error!("Self-test '{}' failed: {}", name, e);
                ok = false;
                messages.push(format!("{} ❌ {}", name, e));
            }
        }
    }

    SelfTestReport { ok, messages }
}
