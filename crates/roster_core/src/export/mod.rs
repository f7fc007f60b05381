//! CSV export of the full roster with current annotations.
//!
//! # Invariants
//! - Export walks the unfiltered creator list in roster order.
//! - Timestamps are ISO-8601 UTC with millisecond precision, or empty when
//!   the annotation was never updated.

mod csv;

pub use csv::{
    export_rows, format_timestamp, to_csv, write_csv_file, ExportRow, DEFAULT_EXPORT_FILE,
    EXPORT_HEADER,
};
