//! Ratify Store - whole-collection key-value persistence
//!
//! The persistence model is deliberately primitive: each collection lives
//! under a fixed key as a single JSON blob, replaced wholesale on every
//! write. There are no transactions and no partial updates; callers follow a
//! read-collection, mutate-in-memory, write-collection-back discipline.
//!
//! Two backends are provided:
//! - [`MemoryStore`] - mutex-guarded map, for tests and ephemeral sessions
//! - [`FileStore`] - one JSON file per key under a root directory
//!
//! [`Collection`] layers typed records on top of a raw store and quarantines
//! malformed elements at the boundary instead of trusting parsed shapes.

#![warn(unreachable_pub)]

pub mod collection;
pub mod error;
pub mod kv;

pub use collection::Collection;
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
