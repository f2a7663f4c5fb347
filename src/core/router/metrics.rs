//! Per-provider performance tracking
//!
//! Counters only ever grow. Derived values (success rate, averages) are
//! computed when a snapshot is taken, so they are never stale.

use super::registry::{ProviderConfig, ProviderRegistry};
use crate::core::types::TaskSet;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Outcome of one execution attempt against one provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptOutcome {
    pub success: bool,
    pub latency: Duration,
    pub cost: f64,
}

impl AttemptOutcome {
    pub fn success(latency: Duration, cost: f64) -> Self {
        Self {
            success: true,
            latency,
            cost,
        }
    }

    pub fn failure(latency: Duration) -> Self {
        Self {
            success: false,
            latency,
            cost: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Counters {
    total_requests: u64,
    successful_requests: u64,
    total_latency: Duration,
    total_cost: f64,
}

/// Point-in-time view of a provider's observed behaviour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub total_latency_ms: f64,
    pub total_cost: f64,
    pub success_rate: f64,
    pub avg_latency_ms: f64,
    pub avg_cost: f64,
}

impl From<&Counters> for PerformanceRecord {
    fn from(c: &Counters) -> Self {
        let total_latency_ms = c.total_latency.as_secs_f64() * 1000.0;
        let (success_rate, avg_latency_ms, avg_cost) = if c.total_requests == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let n = c.total_requests as f64;
            (
                c.successful_requests as f64 / n,
                total_latency_ms / n,
                c.total_cost / n,
            )
        };

        Self {
            total_requests: c.total_requests,
            successful_requests: c.successful_requests,
            total_latency_ms,
            total_cost: c.total_cost,
            success_rate,
            avg_latency_ms,
            avg_cost,
        }
    }
}

/// Static attributes plus observed performance, for observability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub active: bool,
    pub priority: u32,
    pub model: String,
    pub capabilities: TaskSet,
    pub cost_per_token: f64,
    pub max_tokens: u32,
    pub performance: Option<PerformanceRecord>,
}

/// Accumulates per-provider counters used for scoring and analytics
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    records: DashMap<String, Counters>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one execution attempt
    ///
    /// The entry guard holds the shard lock for the whole read-modify-write,
    /// so concurrent calls for the same provider never lose an update.
    pub fn record(&self, provider_id: &str, outcome: AttemptOutcome) {
        let mut counters = self.records.entry(provider_id.to_string()).or_default();
        counters.total_requests += 1;
        if outcome.success {
            counters.successful_requests += 1;
        }
        counters.total_latency += outcome.latency;
        counters.total_cost += outcome.cost;

        debug!(
            provider = %provider_id,
            success = outcome.success,
            latency_ms = outcome.latency.as_millis() as u64,
            cost = outcome.cost,
            total_requests = counters.total_requests,
            "recorded attempt"
        );
    }

    /// Snapshot of one provider; `None` when it has no history yet
    pub fn snapshot(&self, provider_id: &str) -> Option<PerformanceRecord> {
        self.records
            .get(provider_id)
            .map(|counters| PerformanceRecord::from(counters.value()))
    }

    /// Configuration and performance of every registered provider
    pub fn status_all(&self, registry: &ProviderRegistry) -> BTreeMap<String, ProviderStatus> {
        registry
            .all()
            .into_iter()
            .map(|config| {
                let performance = self.snapshot(&config.id);
                (config.id.clone(), status_of(config, performance))
            })
            .collect()
    }
}

fn status_of(config: ProviderConfig, performance: Option<PerformanceRecord>) -> ProviderStatus {
    ProviderStatus {
        active: config.active,
        priority: config.priority,
        model: config.model,
        capabilities: config.capabilities,
        cost_per_token: config.cost_per_token,
        max_tokens: config.max_tokens,
        performance,
    }
}
