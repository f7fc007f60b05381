//! Annotation store: the handle → annotation mapping and its persistence.
//!
//! # Responsibility
//! - Rehydrate the mapping once from durable storage.
//! - Serve total reads with a synthesized default.
//! - Merge updates and persist the whole mapping before returning.
//!
//! # Invariants
//! - Load never fails: a missing or unreadable blob, or one that is not a
//!   JSON object, is an empty mapping.
//! - A stored entry that does not decode is dropped on its own; the other
//!   entries load and survive the next write.
//! - Reads never insert entries.
//! - After a mutation returns `Ok`, storage holds exactly the in-memory
//!   mapping. After it returns `Err`, memory is rolled back to the value it
//!   had before the call.

use crate::model::annotation::{Annotation, AnnotationPatch, Status};
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::service::clock::{Clock, SystemClock};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized mapping.
pub const STATE_KEY: &str = "creatorState.v1";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store mutation. Reads and loads never fail.
#[derive(Debug)]
pub enum StoreError {
    /// Mapping could not be serialized.
    Encode(serde_json::Error),
    /// Durable write was rejected.
    Persist(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode roster state: {err}"),
            Self::Persist(err) => write!(f, "failed to persist roster state: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persist(value)
    }
}

/// Explicit store object with injected persistence and clock.
pub struct AnnotationStore<R: KvRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    entries: BTreeMap<String, Annotation>,
}

impl<R: KvRepository> AnnotationStore<R> {
    /// Loads the mapping from `repo`, stamping updates with wall-clock time.
    pub fn load(repo: R) -> Self {
        Self::load_with_clock(repo, SystemClock)
    }
}

impl<R: KvRepository, C: Clock> AnnotationStore<R, C> {
    /// Loads the mapping from `repo`.
    ///
    /// Never fails; see module invariants.
    pub fn load_with_clock(repo: R, clock: C) -> Self {
        let entries = match repo.read(STATE_KEY) {
            Ok(Some(blob)) => match decode_state(&blob) {
                Ok(entries) => {
                    info!(
                        "event=state_load module=store status=ok entries={}",
                        entries.len()
                    );
                    entries
                }
                Err(err) => {
                    warn!(
                        "event=state_load module=store status=degraded reason=malformed bytes={} error={}",
                        blob.len(),
                        err
                    );
                    BTreeMap::new()
                }
            },
            Ok(None) => {
                info!("event=state_load module=store status=ok entries=0 reason=absent");
                BTreeMap::new()
            }
            Err(err) => {
                warn!(
                    "event=state_load module=store status=degraded reason=read_failed error={}",
                    err
                );
                BTreeMap::new()
            }
        };

        Self {
            repo,
            clock,
            entries,
        }
    }

    /// Returns the annotation for `handle`, or the default when absent.
    pub fn get(&self, handle: &str) -> Annotation {
        self.entries.get(handle).cloned().unwrap_or_default()
    }

    /// Returns the current status for `handle`.
    pub fn status(&self, handle: &str) -> Status {
        self.entries
            .get(handle)
            .map(|annotation| annotation.status)
            .unwrap_or_default()
    }

    /// Merges `patch` onto the current annotation, stamps "now" and persists.
    ///
    /// Returns the annotation as written.
    pub fn update(&mut self, handle: &str, patch: AnnotationPatch) -> StoreResult<Annotation> {
        let next = self.get(handle).merged(&patch, self.clock.now_ms());
        let previous = self.entries.insert(handle.to_string(), next.clone());

        if let Err(err) = self.persist() {
            match previous {
                Some(annotation) => self.entries.insert(handle.to_string(), annotation),
                None => self.entries.remove(handle),
            };
            return Err(err);
        }

        debug!(
            "event=state_update module=store status=ok handle={} status_set={} note_set={}",
            handle,
            patch.status.is_some(),
            patch.note.is_some()
        );
        Ok(next)
    }

    /// Set-status intent.
    pub fn set_status(&mut self, handle: &str, status: Status) -> StoreResult<Annotation> {
        self.update(handle, AnnotationPatch::status(status))
    }

    /// Set-note intent.
    pub fn set_note(&mut self, handle: &str, note: impl Into<String>) -> StoreResult<Annotation> {
        self.update(handle, AnnotationPatch::note(note))
    }

    /// Drops every annotation and persists the empty mapping.
    ///
    /// Confirmation is the caller's responsibility.
    pub fn reset(&mut self) -> StoreResult<()> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(err) = self.persist() {
            self.entries = previous;
            return Err(err);
        }

        info!(
            "event=state_reset module=store status=ok cleared={}",
            previous.len()
        );
        Ok(())
    }

    /// Read-only view of the stored mapping, ordered by handle.
    pub fn entries(&self) -> &BTreeMap<String, Annotation> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    fn persist(&mut self) -> StoreResult<()> {
        let blob = encode_state(&self.entries).map_err(StoreError::Encode)?;
        if let Err(err) = self.repo.write(STATE_KEY, &blob) {
            warn!(
                "event=state_persist module=store status=error entries={} error={}",
                self.entries.len(),
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

/// Serializes the mapping to the stored JSON object form.
pub fn encode_state(entries: &BTreeMap<String, Annotation>) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}

/// Parses a stored blob. A JSON `null` is treated as an empty mapping.
///
/// Fails only when the blob is not a JSON object. Entries that do not decode
/// as an [`Annotation`] are skipped and logged.
pub fn decode_state(blob: &str) -> serde_json::Result<BTreeMap<String, Annotation>> {
    let parsed: Option<BTreeMap<String, Value>> = serde_json::from_str(blob)?;
    let mut entries = BTreeMap::new();
    for (handle, raw) in parsed.unwrap_or_default() {
        match serde_json::from_value::<Annotation>(raw) {
            Ok(annotation) => {
                entries.insert(handle, annotation);
            }
            Err(err) => warn!(
                "event=state_load module=store status=degraded reason=bad_entry handle={} error={}",
                handle, err
            ),
        }
    }
    Ok(entries)
}
