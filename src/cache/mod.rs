//! Store-agnostic read caching.
//!
//! Query results are held in a bounded in-memory map and served until they
//! expire or a write invalidates them. Nothing here persists across runs.

mod layer;
mod store;

pub use layer::ReadCache;
