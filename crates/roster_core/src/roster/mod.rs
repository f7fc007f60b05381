//! Roster input: turning a newline-separated handle file into creators.
//!
//! # Invariants
//! - Parsed handles are trimmed, non-empty and unique (first occurrence
//!   wins).
//! - Input order is preserved; it is the "insertion order" views fall back
//!   to.

mod source;

pub use source::{load_roster_file, parse_roster, RosterError, RosterResult, DEFAULT_ROSTER_FILE};
