//! Roster source: the newline-separated handle list.
//!
//! # Responsibility
//! - Read the roster file and turn it into [`Creator`] records.
//!
//! # Invariants
//! - Handles are trimmed; blank lines are dropped.
//! - Each handle appears once; the first occurrence keeps its position.

use crate::model::creator::Creator;
use log::{debug, error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name the roster is read from when none is configured.
pub const DEFAULT_ROSTER_FILE: &str = "active_streamers.txt";

pub type RosterResult<T> = Result<T, RosterError>;

/// Input-fetch failure. Surfaced to the user; the core stays unpopulated.
#[derive(Debug)]
pub enum RosterError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read roster `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
        }
    }
}

/// Parses newline-separated handles (`\n` or `\r\n`).
pub fn parse_roster(text: &str) -> Vec<Creator> {
    let mut seen = HashSet::new();
    let mut creators = Vec::new();

    for creator in text.lines().filter_map(Creator::new) {
        if !seen.insert(creator.handle.clone()) {
            debug!(
                "event=roster_parse module=roster status=skipped reason=duplicate handle={}",
                creator.handle
            );
            continue;
        }
        creators.push(creator);
    }

    creators
}

/// Reads and parses the roster file at `path`.
pub fn load_roster_file(path: impl AsRef<Path>) -> RosterResult<Vec<Creator>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| {
        error!(
            "event=roster_load module=roster status=error path={} error={}",
            path.display(),
            source
        );
        RosterError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let creators = parse_roster(&text);
    info!(
        "event=roster_load module=roster status=ok path={} creators={}",
        path.display(),
        creators.len()
    );
    Ok(creators)
}

#[cfg(test)]
mod tests {
    use super::parse_roster;

    fn handles(text: &str) -> Vec<String> {
        parse_roster(text)
            .into_iter()
            .map(|creator| creator.handle)
            .collect()
    }

    #[test]
    fn parse_handles_crlf_blank_lines_and_padding() {
        assert_eq!(
            handles("alice\r\n\r\n  bob  \n\t\ncarol"),
            vec!["alice", "bob", "carol"]
        );
    }

    #[test]
    fn parse_keeps_first_occurrence_of_duplicates() {
        assert_eq!(handles("bob\nalice\nbob\n"), vec!["bob", "alice"]);
    }

    #[test]
    fn parse_empty_input_yields_no_creators() {
        assert!(parse_roster("").is_empty());
        assert!(parse_roster("\n \r\n").is_empty());
    }
}
