//! Bounded in-memory caches.
//!
//! Two eviction policies for capping accumulated result sets:
//! - [`LruCache`] evicts exactly the least-recently-used entry
//! - [`BoundedMap`] evicts the oldest fifth of its capacity in one batch
//!
//! Neither structure locks internally. Share one across threads behind a
//! mutex if interleaved mutation is possible.

mod bounded;
mod lru;

pub use bounded::{BoundedMap, DEFAULT_BOUNDED_CAPACITY};
pub use lru::{LruCache, DEFAULT_LRU_CAPACITY};
