/// Report export: JSON and CSV renderings of a finished scan.
use crate::error::ReportError;
use crate::scanner::ScanResult;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    #[serde(flatten)]
    result: &'a ScanResult,
}

/// Write the whole result as pretty-printed JSON with a timestamp.
pub fn write_json<W: Write>(result: &ScanResult, writer: W) -> Result<(), ReportError> {
    let report = JsonReport {
        generated_at: Local::now(),
        result,
    };
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    path: &'a Path,
    category: &'static str,
    size: u64,
    /// Permission string when flagged, empty otherwise.
    unusual_permissions: &'a str,
    large: bool,
}

/// Write one row per categorised file, category by category, largest first.
pub fn write_csv<W: Write>(result: &ScanResult, writer: W) -> Result<(), ReportError> {
    let flagged: HashMap<&Path, &str> = result
        .unusual_permissions
        .iter()
        .map(|f| (f.path.as_path(), f.permissions.as_str()))
        .collect();
    let large: HashSet<&Path> = result.large_files.iter().map(|e| e.path.as_path()).collect();

    let mut csv = csv::Writer::from_writer(writer);
    for (category, summary) in &result.categories {
        for entry in &summary.files {
            let path = entry.path.as_path();
            csv.serialize(CsvRow {
                path,
                category: category.key(),
                size: entry.size,
                unusual_permissions: flagged.get(path).copied().unwrap_or(""),
                large: large.contains(path),
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}
