//! Configuration data models

pub mod optimization;
pub mod provider;

pub use crate::core::router::config::RouterConfig;
pub use optimization::*;
pub use provider::*;

pub fn default_true() -> bool {
    true
}

/// Default cache TTL in seconds
pub fn default_cache_ttl() -> u64 {
    3600
}

pub fn default_cache_max_size() -> usize {
    1000
}

/// Default cache sweep period in seconds
pub fn default_cleanup_interval() -> u64 {
    300
}

pub fn default_cost_threshold() -> f64 {
    0.1
}

pub fn default_latency_threshold_ms() -> u64 {
    5000
}

pub fn default_similarity_threshold() -> f64 {
    0.8
}

pub fn default_max_results() -> usize {
    10
}

pub fn default_max_clusters() -> usize {
    10
}

pub fn default_quality_threshold() -> f64 {
    0.5
}
