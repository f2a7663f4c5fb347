//! Response cache
//!
//! Content-addressed entries with a per-entry TTL and a hard capacity. At
//! capacity the oldest-inserted entry is evicted; reads never change the
//! eviction order.

pub mod manager;
pub mod types;


pub use manager::CacheManager;
pub use types::{CacheConfig, CacheEntry, CacheKey, CacheStats};
