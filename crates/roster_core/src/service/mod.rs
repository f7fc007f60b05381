//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory annotation mapping and its write path.
//! - Keep CLI callers decoupled from storage details.

pub mod annotation_store;
pub mod clock;
