//! Derived roster views: search, status filter, sort and summary counts.
//!
//! # Responsibility
//! - Compute the visible, ordered subset of creators for one query.
//! - Summarize status counts over the whole roster.
//!
//! # Invariants
//! - Every predicate reads annotations at call time; nothing is cached.
//! - Counts ignore search and filter.
//! - Sorting is stable.

mod collate;
mod pipeline;

pub use collate::compare_handles;
pub use pipeline::{
    compute_view, count_statuses, filter_creators, sort_creators, AnnotationLookup, RosterView,
    SortMode, StatusCounts, StatusFilter, ViewQuery,
};
