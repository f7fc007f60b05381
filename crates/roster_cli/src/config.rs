//! Resolved runtime configuration for the `roster` binary.
//!
//! # Invariants
//! - Every path is absolute once resolved.
//! - The database and log directory always live under `data_dir`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "roster.sqlite3";
pub const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub roster_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl CliConfig {
    /// Resolves user-facing options against the current directory.
    pub fn resolve(data_dir: &Path, roster_path: &Path, log_level: Option<&str>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Ok(Self::resolve_from(&cwd, data_dir, roster_path, log_level))
    }

    fn resolve_from(
        cwd: &Path,
        data_dir: &Path,
        roster_path: &Path,
        log_level: Option<&str>,
    ) -> Self {
        let data_dir = absolutize(cwd, data_dir);
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            roster_path: absolutize(cwd, roster_path),
            log_level: log_level
                .map(str::to_string)
                .unwrap_or_else(|| roster_core::default_log_level().to_string()),
            data_dir,
        }
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
