//! CSV export of the full roster.
//!
//! # Responsibility
//! - Project every roster creator with its current annotation.
//! - Render rows as CSV and write them to a file.
//!
//! # Invariants
//! - Export ignores search, filter and sort; row order is roster order.
//! - Every cell is quoted and embedded quotes are doubled.
//! - A never-updated annotation exports an empty `updated_at` cell.

use crate::model::annotation::Status;
use crate::model::creator::Creator;
use crate::view::AnnotationLookup;
use chrono::{SecondsFormat, TimeZone, Utc};
use log::info;
use std::path::Path;

/// File name used when the caller does not choose one.
pub const DEFAULT_EXPORT_FILE: &str = "creator_export.csv";

pub const EXPORT_HEADER: [&str; 4] = ["handle", "status", "note", "updated_at"];

/// One exported creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub handle: String,
    pub status: Status,
    pub note: String,
    /// ISO-8601 or empty.
    pub updated_at: String,
}

impl ExportRow {
    fn cells(&self) -> [&str; 4] {
        [
            self.handle.as_str(),
            self.status.as_str(),
            self.note.as_str(),
            self.updated_at.as_str(),
        ]
    }
}

/// Projects every creator with its current annotation.
pub fn export_rows<L>(creators: &[Creator], lookup: &L) -> Vec<ExportRow>
where
    L: AnnotationLookup + ?Sized,
{
    creators
        .iter()
        .map(|creator| {
            let annotation = lookup.annotation(&creator.handle);
            ExportRow {
                handle: creator.handle.clone(),
                status: annotation.status,
                note: annotation.note,
                updated_at: format_timestamp(annotation.updated_at),
            }
        })
        .collect()
}

/// Formats epoch millis as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Returns an empty string for `0` and for values outside chrono's range.
pub fn format_timestamp(epoch_ms: i64) -> String {
    if epoch_ms == 0 {
        return String::new();
    }
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Serializes rows with a header line. Every cell is quoted.
pub fn to_csv(rows: &[ExportRow]) -> String {
    std::iter::once(EXPORT_HEADER)
        .chain(rows.iter().map(ExportRow::cells))
        .map(|cells| {
            cells
                .iter()
                .map(|cell| quote_cell(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes [`to_csv`] output to `path`.
pub fn write_csv_file(path: impl AsRef<Path>, rows: &[ExportRow]) -> std::io::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_csv(rows))?;
    info!(
        "event=export_csv module=export status=ok path={} rows={}",
        path.display(),
        rows.len()
    );
    Ok(())
}

fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
