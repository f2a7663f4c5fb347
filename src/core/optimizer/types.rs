//! Optimization layer request, response and analytics types

use crate::config::OptimizationConfig;
use crate::core::retrieval::{Cluster, RetrievalResult};
use crate::core::types::{RequestPriority, duration_ms};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Optimization applied while serving one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Optimization {
    CacheHit,
    ParameterOptimization,
    ResultCached,
    RequestOptimization,
    FallbackAttempted,
    FallbackFailed,
    AutoKOptimization,
    QualityReoptimization,
}

impl Optimization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Optimization::CacheHit => "cache-hit",
            Optimization::ParameterOptimization => "parameter-optimization",
            Optimization::ResultCached => "result-cached",
            Optimization::RequestOptimization => "request-optimization",
            Optimization::FallbackAttempted => "fallback-attempted",
            Optimization::FallbackFailed => "fallback-failed",
            Optimization::AutoKOptimization => "auto-k-optimization",
            Optimization::QualityReoptimization => "quality-reoptimization",
        }
    }
}

impl fmt::Display for Optimization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller options for [`optimized_query`](super::OptimizationLayer::optimized_query)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Consult the cache before retrieving
    #[serde(default = "crate::config::default_true")]
    pub use_cache: bool,
    /// Skip the cache lookup but still store the fresh result
    #[serde(default)]
    pub force_refresh: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            limit: None,
            use_cache: true,
            force_refresh: false,
        }
    }
}

impl QueryOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Caller options for [`optimized_ai_request`](super::OptimizationLayer::optimized_ai_request)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiRequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<RequestPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_clusters: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRequestMetadata {
    #[serde(rename = "processing_time_ms", with = "duration_ms")]
    pub processing_time: Duration,
    pub optimizations: Vec<Optimization>,
    pub fallback_used: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedAiResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub cost: f64,
    pub metadata: AiRequestMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    pub cache_hit: bool,
    #[serde(rename = "processing_time_ms", with = "duration_ms")]
    pub processing_time: Duration,
    pub optimizations: Vec<Optimization>,
}

/// Retrieval result plus how it was served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedQueryResponse {
    #[serde(flatten)]
    pub result: RetrievalResult,
    pub metadata: QueryMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringMetrics {
    pub silhouette_score: f64,
    pub optimal_k: usize,
    #[serde(rename = "processing_time_ms", with = "duration_ms")]
    pub processing_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringReport {
    pub clusters: Vec<Cluster>,
    pub metrics: ClusteringMetrics,
    pub optimizations: Vec<Optimization>,
}

/// Aggregates over the recorded retrieval queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalytics {
    pub avg_response_time_ms: f64,
    /// Fraction of queries served from cache, in `0.0..=1.0`
    pub cache_hit_rate: f64,
    pub total_queries: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiRequestAnalytics {
    pub avg_response_time_ms: f64,
    /// Fraction of requests that produced a response, in `0.0..=1.0`
    pub success_rate: f64,
    pub cost_per_request: f64,
    /// Number of responses served by each provider
    pub provider_distribution: BTreeMap<String, usize>,
    pub total_requests: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringAnalytics {
    pub avg_processing_time_ms: f64,
    pub avg_silhouette_score: f64,
    /// Sum of the chosen k over all runs
    pub total_clusters: usize,
    pub total_runs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub component: String,
    pub recommendation: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalytics {
    pub rag_queries: QueryAnalytics,
    pub ai_requests: AiRequestAnalytics,
    pub clustering: ClusteringAnalytics,
    pub recommendations: Vec<Recommendation>,
}

/// One configuration change made by the auto-optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOptimization {
    pub component: String,
    pub action: String,
    pub expected_impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoOptimizeReport {
    pub optimizations: Vec<AppliedOptimization>,
    pub new_config: OptimizationConfig,
}
