//! Core domain logic for the creator roster.
//! This crate owns the annotation store, the derived roster views, and the
//! roster input/export boundaries.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod roster;
pub mod service;
pub mod view;

pub use export::{export_rows, format_timestamp, to_csv, write_csv_file, ExportRow};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::annotation::{Annotation, AnnotationPatch, Status};
pub use model::creator::{profile_url, Creator};
pub use repo::kv_repo::{KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use roster::{load_roster_file, parse_roster, RosterError, RosterResult};
pub use service::annotation_store::{AnnotationStore, StoreError, StoreResult, STATE_KEY};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use view::{
    compute_view, AnnotationLookup, RosterView, SortMode, StatusCounts, StatusFilter, ViewQuery,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
