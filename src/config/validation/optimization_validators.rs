//! Optimization layer configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use std::fmt::Display;
use std::ops::RangeInclusive;

fn check_range<T>(name: &str, value: T, range: RangeInclusive<T>) -> Result<(), String>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        ))
    }
}

impl Validate for CachingConfig {
    fn validate(&self) -> Result<(), String> {
        check_range("Cache TTL", self.ttl, CACHE_TTL_RANGE)?;
        check_range("Cache max size", self.max_size, CACHE_MAX_SIZE_RANGE)?;

        if self.cleanup_interval_secs == 0 {
            return Err("Cache cleanup interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for AiRoutingConfig {
    fn validate(&self) -> Result<(), String> {
        check_range("Cost threshold", self.cost_threshold, COST_THRESHOLD_RANGE)?;
        check_range(
            "Latency threshold",
            self.latency_threshold_ms,
            LATENCY_THRESHOLD_MS_RANGE,
        )
    }
}

impl Validate for VectorSearchConfig {
    fn validate(&self) -> Result<(), String> {
        check_range(
            "Similarity threshold",
            self.default_threshold,
            SIMILARITY_THRESHOLD_RANGE,
        )?;
        check_range("Max results", self.max_results, MAX_RESULTS_RANGE)
    }
}

impl Validate for ClusteringConfig {
    fn validate(&self) -> Result<(), String> {
        check_range("Max clusters", self.max_clusters, MAX_CLUSTERS_RANGE)?;
        check_range(
            "Quality threshold",
            self.quality_threshold,
            QUALITY_THRESHOLD_RANGE,
        )
    }
}

impl Validate for OptimizationConfig {
    fn validate(&self) -> Result<(), String> {
        self.caching.validate()?;
        self.ai_routing.validate()?;
        self.vector_search.validate()?;
        self.clustering.validate()
    }
}
