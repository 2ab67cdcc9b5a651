//! In-memory read-through cache for paginated query responses.
//!
//! This module provides the response-caching mechanism used by the list
//! endpoints:
//! - Stores serialized result pages keyed by their query parameters
//! - Serves stored results while they are within the freshness window (60s)
//! - Delegates to the underlying database read on a miss and stores the result
//! - Is invalidated wholesale whenever any write to the collection commits
//!
//! There is no eviction policy and no background sweep: entries accumulate for
//! the process lifetime, staleness is checked lazily on lookup, and the cache
//! is lost on restart by design.

mod keys;
mod layer;
mod store;

pub use keys::{ListKey, QueryKey};
pub use layer::{is_fresh, CacheOutcome, ResponseCache};
pub use store::{CacheEntry, CacheStore};
