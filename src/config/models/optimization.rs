//! Optimization layer configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted cache TTL, in seconds
pub const CACHE_TTL_RANGE: RangeInclusive<u64> = 300..=86_400;
pub const CACHE_MAX_SIZE_RANGE: RangeInclusive<usize> = 100..=10_000;
pub const COST_THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const LATENCY_THRESHOLD_MS_RANGE: RangeInclusive<u64> = 1000..=30_000;
pub const SIMILARITY_THRESHOLD_RANGE: RangeInclusive<f64> = 0.1..=1.0;
pub const MAX_RESULTS_RANGE: RangeInclusive<usize> = 1..=100;
pub const MAX_CLUSTERS_RANGE: RangeInclusive<usize> = 2..=50;
pub const QUALITY_THRESHOLD_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Response cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Entry lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: default_cache_ttl(),
            max_size: default_cache_max_size(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// AI request routing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRoutingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Default per-request budget
    #[serde(default = "default_cost_threshold")]
    pub cost_threshold: f64,
    #[serde(default = "default_latency_threshold_ms")]
    pub latency_threshold_ms: u64,
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
}

impl Default for AiRoutingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cost_threshold: default_cost_threshold(),
            latency_threshold_ms: default_latency_threshold_ms(),
            fallback_enabled: true,
        }
    }
}

/// Retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum similarity of returned documents
    #[serde(default = "default_similarity_threshold")]
    pub default_threshold: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_true")]
    pub index_optimization: bool,
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_threshold: default_similarity_threshold(),
            max_results: default_max_results(),
            index_optimization: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub auto_optimize_k: bool,
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,
    /// Minimum acceptable silhouette score
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_optimize_k: true,
            max_clusters: default_max_clusters(),
            quality_threshold: default_quality_threshold(),
        }
    }
}

/// Everything the optimization layer tunes at runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    #[serde(default)]
    pub caching: CachingConfig,
    #[serde(default)]
    pub ai_routing: AiRoutingConfig,
    #[serde(default)]
    pub vector_search: VectorSearchConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
}
