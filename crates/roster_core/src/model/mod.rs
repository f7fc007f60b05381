//! Domain model for the creator roster.
//!
//! # Responsibility
//! - Define the session-only `Creator` record parsed from the handle list.
//! - Define the persisted `Annotation` attached to each handle.
//!
//! # Invariants
//! - Creators are identified by handle; annotations are keyed by the same
//!   string.
//! - The default annotation is synthesized on read, never stored.

pub mod annotation;
pub mod creator;
