//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value storage contract that state blobs use.
//! - Isolate SQLite details from the annotation store.
//!
//! # Invariants
//! - Repositories store opaque strings; encoding belongs to the caller.

pub mod kv_repo;
