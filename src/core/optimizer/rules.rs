//! Auto-tuning rules
//!
//! Each rule reads one aggregate from [`PerformanceAnalytics`] and moves one
//! configuration value. A rule fires only when the samples it reads exist,
//! and a change is reported only when the value actually moved.

use super::types::{AppliedOptimization, Impact, PerformanceAnalytics, Recommendation};
use crate::config::{COST_THRESHOLD_RANGE, CACHE_TTL_RANGE, OptimizationConfig};

/// Queries needed before the cache hit rate is trusted
pub const MIN_CACHE_SAMPLES: usize = 10;
/// Hit rate below which the cache TTL is raised
pub const LOW_HIT_RATE: f64 = 0.3;
pub const TTL_GROWTH: f64 = 1.5;
/// Fraction of the observed average cost the threshold is set to
pub const COST_REDUCTION: f64 = 0.8;
/// Average retrieval latency above which the similarity threshold is raised
pub const SLOW_QUERY_MS: f64 = 2000.0;
pub const SIMILARITY_STEP: f64 = 0.1;
pub const MAX_SIMILARITY_THRESHOLD: f64 = 0.95;
pub const QUALITY_RELAXATION: f64 = 0.1;
pub const MIN_QUALITY_THRESHOLD: f64 = 0.3;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn applied(component: &str, action: String, expected_impact: &str) -> AppliedOptimization {
    AppliedOptimization {
        component: component.to_string(),
        action,
        expected_impact: expected_impact.to_string(),
    }
}

fn recommendation(component: &str, text: &str, impact: Impact) -> Recommendation {
    Recommendation {
        component: component.to_string(),
        recommendation: text.to_string(),
        impact,
    }
}

/// Derives configuration changes from observed performance
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoOptimizer;

impl AutoOptimizer {
    /// Advice for the current analytics, without changing anything
    pub fn recommend(
        &self,
        analytics: &PerformanceAnalytics,
        config: &OptimizationConfig,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        let queries = &analytics.rag_queries;
        let requests = &analytics.ai_requests;
        let clustering = &analytics.clustering;

        if queries.total_queries > 0 && queries.cache_hit_rate < LOW_HIT_RATE {
            recommendations.push(recommendation(
                "RAG Pipeline",
                "Consider increasing cache TTL or improving query patterns",
                Impact::Medium,
            ));
        }

        if queries.total_queries > 0 && queries.avg_response_time_ms > SLOW_QUERY_MS {
            recommendations.push(recommendation(
                "Vector Search",
                "Raise the similarity threshold to return fewer, more relevant results",
                Impact::Medium,
            ));
        }

        if requests.total_requests > 0
            && requests.cost_per_request > config.ai_routing.cost_threshold
        {
            recommendations.push(recommendation(
                "AI Router",
                "Consider using more cost-effective providers for routine tasks",
                Impact::High,
            ));
        }

        if clustering.total_runs > 0
            && clustering.avg_silhouette_score < config.clustering.quality_threshold
        {
            recommendations.push(recommendation(
                "Clustering",
                "Consider preprocessing content more thoroughly or adjusting clustering parameters",
                Impact::Medium,
            ));
        }

        recommendations
    }

    /// Apply every rule to a copy of `config`
    pub fn tune(
        &self,
        analytics: &PerformanceAnalytics,
        config: &OptimizationConfig,
    ) -> (OptimizationConfig, Vec<AppliedOptimization>) {
        let mut tuned = config.clone();
        let mut changes = Vec::new();
        let queries = &analytics.rag_queries;
        let requests = &analytics.ai_requests;
        let clustering = &analytics.clustering;

        if queries.total_queries >= MIN_CACHE_SAMPLES && queries.cache_hit_rate < LOW_HIT_RATE {
            let grown = (config.caching.ttl as f64 * TTL_GROWTH) as u64;
            let ttl = grown.min(*CACHE_TTL_RANGE.end());
            if ttl != config.caching.ttl {
                tuned.caching.ttl = ttl;
                changes.push(applied(
                    "Caching",
                    format!("Increased cache TTL to {}s", ttl),
                    "Improved cache hit rate and reduced latency",
                ));
            }
        }

        if requests.total_requests > 0
            && requests.cost_per_request > config.ai_routing.cost_threshold
        {
            let threshold = (requests.cost_per_request * COST_REDUCTION)
                .clamp(*COST_THRESHOLD_RANGE.start(), *COST_THRESHOLD_RANGE.end());
            if threshold != config.ai_routing.cost_threshold {
                tuned.ai_routing.cost_threshold = threshold;
                changes.push(applied(
                    "AI Router",
                    format!("Adjusted cost threshold to ${:.3}", threshold),
                    "Increased use of cost-effective providers",
                ));
            }
        }

        if queries.total_queries > 0 && queries.avg_response_time_ms > SLOW_QUERY_MS {
            let current = config.vector_search.default_threshold;
            let threshold = round2((current + SIMILARITY_STEP).min(MAX_SIMILARITY_THRESHOLD));
            if threshold > current {
                tuned.vector_search.default_threshold = threshold;
                changes.push(applied(
                    "Vector Search",
                    format!("Increased similarity threshold to {}", threshold),
                    "Faster search with more relevant results",
                ));
            }
        }

        if clustering.total_runs > 0
            && clustering.avg_silhouette_score < config.clustering.quality_threshold
        {
            let current = config.clustering.quality_threshold;
            let threshold = round2(
                (clustering.avg_silhouette_score - QUALITY_RELAXATION)
                    .max(MIN_QUALITY_THRESHOLD)
                    .min(current),
            );
            if threshold < current {
                tuned.clustering.quality_threshold = threshold;
                changes.push(applied(
                    "Clustering",
                    format!("Adjusted quality threshold to {}", threshold),
                    "Better clustering quality with adaptive parameters",
                ));
            }
        }

        (tuned, changes)
    }
}
