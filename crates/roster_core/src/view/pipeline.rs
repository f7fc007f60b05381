//! View pipeline: search, status filter, sort and summary counts.
//!
//! # Responsibility
//! - Derive the visible creator list from the roster and current annotations.
//! - Count statuses over the whole roster.
//!
//! # Invariants
//! - Pure: no input is mutated and nothing is written to storage.
//! - Filtering keeps roster order; every sort mode is stable.
//! - Counts ignore the query, so `total` always equals the roster length.

use super::collate::compare_handles;
use crate::model::annotation::{Annotation, Status};
use crate::model::creator::Creator;
use crate::repo::kv_repo::KvRepository;
use crate::service::annotation_store::AnnotationStore;
use crate::service::clock::Clock;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Read access to current annotations.
///
/// Implementations must be total: absent handles yield the default.
pub trait AnnotationLookup {
    fn annotation(&self, handle: &str) -> Annotation;

    fn status_of(&self, handle: &str) -> Status {
        self.annotation(handle).status
    }
}

impl<R: KvRepository, C: Clock> AnnotationLookup for AnnotationStore<R, C> {
    fn annotation(&self, handle: &str) -> Annotation {
        self.get(handle)
    }

    fn status_of(&self, handle: &str) -> Status {
        self.status(handle)
    }
}

impl AnnotationLookup for BTreeMap<String, Annotation> {
    fn annotation(&self, handle: &str) -> Annotation {
        self.get(handle).cloned().unwrap_or_default()
    }
}

impl AnnotationLookup for HashMap<String, Annotation> {
    fn annotation(&self, handle: &str) -> Annotation {
        self.get(handle).cloned().unwrap_or_default()
    }
}

/// Status filter selected in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
    /// Value that names no known status. Matches no creator.
    Unrecognized(String),
}

impl StatusFilter {
    /// Parses a UI filter value. Never fails.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == "all" {
            return Self::All;
        }
        match Status::parse(value) {
            Some(status) => Self::Only(status),
            None => Self::Unrecognized(value.to_string()),
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
            Self::Unrecognized(_) => false,
        }
    }
}

/// Ordering applied to the filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Roster file order.
    #[default]
    None,
    Alpha,
    AlphaDesc,
    /// Most recently updated first.
    Updated,
}

impl SortMode {
    /// Parses a UI sort value. Unknown values keep roster order.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "alpha" => Self::Alpha,
            "alpha_desc" => Self::AlphaDesc,
            "updated" => Self::Updated,
            _ => Self::None,
        }
    }
}

/// One recompute-view request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub filter: StatusFilter,
    pub sort: SortMode,
}

/// Per-status totals over the whole roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub uncontacted: usize,
    pub contacted: usize,
    pub joined: usize,
    pub not_fit: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Uncontacted => self.uncontacted,
            Status::Contacted => self.contacted,
            Status::Joined => self.joined,
            Status::NotFit => self.not_fit,
        }
    }

    fn bump(&mut self, status: Status) {
        let slot = match status {
            Status::Uncontacted => &mut self.uncontacted,
            Status::Contacted => &mut self.contacted,
            Status::Joined => &mut self.joined,
            Status::NotFit => &mut self.not_fit,
        };
        *slot += 1;
    }
}

/// Result of [`compute_view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    /// Filtered and sorted creators.
    pub visible: Vec<Creator>,
    /// Counts over the unfiltered roster.
    pub counts: StatusCounts,
}

impl RosterView {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

/// Computes the visible list and summary counts for `query`.
pub fn compute_view<L>(creators: &[Creator], lookup: &L, query: &ViewQuery) -> RosterView
where
    L: AnnotationLookup + ?Sized,
{
    let filtered = filter_creators(creators, lookup, &query.search, &query.filter);
    RosterView {
        visible: sort_creators(filtered, lookup, query.sort),
        counts: count_statuses(creators, lookup),
    }
}

/// Keeps creators whose handle contains `search` (case-insensitive, trimmed)
/// and whose current status passes `filter`. Input order is preserved.
pub fn filter_creators<L>(
    creators: &[Creator],
    lookup: &L,
    search: &str,
    filter: &StatusFilter,
) -> Vec<Creator>
where
    L: AnnotationLookup + ?Sized,
{
    let needle = search.trim().to_lowercase();
    creators
        .iter()
        .filter(|creator| creator.handle.to_lowercase().contains(&needle))
        .filter(|creator| filter.matches(lookup.status_of(&creator.handle)))
        .cloned()
        .collect()
}

/// Stable sort of an already-filtered list.
pub fn sort_creators<L>(mut creators: Vec<Creator>, lookup: &L, mode: SortMode) -> Vec<Creator>
where
    L: AnnotationLookup + ?Sized,
{
    match mode {
        SortMode::None => creators,
        SortMode::Alpha => {
            creators.sort_by(|a, b| compare_handles(&a.handle, &b.handle));
            creators
        }
        SortMode::AlphaDesc => {
            creators.sort_by(|a, b| compare_handles(&b.handle, &a.handle));
            creators
        }
        SortMode::Updated => {
            let mut keyed = creators
                .into_iter()
                .map(|creator| (lookup.annotation(&creator.handle).updated_at, creator))
                .collect::<Vec<_>>();
            keyed.sort_by_key(|(updated_at, _)| Reverse(*updated_at));
            keyed.into_iter().map(|(_, creator)| creator).collect()
        }
    }
}

/// Counts every creator by its current status.
pub fn count_statuses<L>(creators: &[Creator], lookup: &L) -> StatusCounts
where
    L: AnnotationLookup + ?Sized,
{
    let mut counts = StatusCounts {
        total: creators.len(),
        ..StatusCounts::default()
    };
    for creator in creators {
        counts.bump(lookup.status_of(&creator.handle));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::{SortMode, StatusFilter};
    use crate::model::annotation::Status;

    #[test]
    fn filter_parse_maps_known_and_unknown_values() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("not_fit"),
            StatusFilter::Only(Status::NotFit)
        );
        assert_eq!(
            StatusFilter::parse("archived"),
            StatusFilter::Unrecognized("archived".to_string())
        );
    }

    #[test]
    fn unrecognized_filter_matches_nothing() {
        let filter = StatusFilter::parse("stale");
        assert!(Status::ALL.iter().all(|status| !filter.matches(*status)));
    }

    #[test]
    fn sort_parse_falls_back_to_roster_order() {
        assert_eq!(SortMode::parse("alpha_desc"), SortMode::AlphaDesc);
        assert_eq!(SortMode::parse("updated"), SortMode::Updated);
        assert_eq!(SortMode::parse("random"), SortMode::None);
        assert_eq!(SortMode::parse(""), SortMode::None);
    }
}
