//! Provider selection logic
//!
//! Every eligible provider gets a composite score; the lowest score wins.
//! Scoring only reads snapshots, so a selection racing with in-flight
//! updates may see slightly stale performance data.

use super::metrics::PerformanceRecord;
use super::registry::ProviderConfig;
use super::router::Router;
use crate::core::types::AiRequest;
use crate::utils::error::{GatewayError, Result};
use tracing::debug;

/// Weight applied to the configured priority
pub const PRIORITY_WEIGHT: f64 = 10.0;
/// Brings per-token cost onto the same scale as the other terms
pub const COST_SCALE: f64 = 1_000_000.0;
/// Weight applied to the observed failure rate
pub const FAILURE_WEIGHT: f64 = 50.0;
/// Average latency is counted in seconds
pub const LATENCY_DIVISOR: f64 = 1000.0;
/// Flat penalty for an estimated cost above the request budget
pub const OVER_BUDGET_PENALTY: f64 = 1000.0;

/// A provider together with the score it got for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProvider {
    pub config: ProviderConfig,
    pub score: f64,
}

/// Tokens a call may produce: the request limit capped at the provider's,
/// or the provider's own limit when the request sets none (or zero)
pub fn token_limit(request: &AiRequest, provider: &ProviderConfig) -> u32 {
    request
        .max_tokens
        .filter(|tokens| *tokens > 0)
        .map_or(provider.max_tokens, |tokens| tokens.min(provider.max_tokens))
}

/// Worst-case cost of serving `request` with `provider`
pub fn estimate_cost(request: &AiRequest, provider: &ProviderConfig) -> f64 {
    f64::from(token_limit(request, provider)) * provider.cost_per_token
}

/// Composite score of `provider` for `request`; lower is better
///
/// Providers without history get no success-rate or latency penalty. The
/// budget term is a soft penalty: an over-budget provider stays selectable.
pub fn score(
    provider: &ProviderConfig,
    request: &AiRequest,
    performance: Option<&PerformanceRecord>,
) -> f64 {
    let mut score = f64::from(provider.priority) * PRIORITY_WEIGHT
        + provider.cost_per_token * COST_SCALE;

    if let Some(perf) = performance.filter(|p| p.total_requests > 0) {
        score += (1.0 - perf.success_rate) * FAILURE_WEIGHT;
        score += perf.avg_latency_ms / LATENCY_DIVISOR;
    }

    // A zero budget means "no budget"
    if let Some(budget) = request.budget.filter(|b| *b > 0.0) {
        if estimate_cost(request, provider) > budget {
            score += OVER_BUDGET_PENALTY;
        }
    }

    score
}

impl Router {
    /// Score every eligible provider not in `exclude`, best first
    ///
    /// The sort is stable, so equal scores keep registration order.
    pub fn rank_providers(&self, request: &AiRequest, exclude: &[&str]) -> Vec<ScoredProvider> {
        let mut ranked: Vec<ScoredProvider> = self
            .registry
            .eligible(request.task)
            .into_iter()
            .filter(|p| !exclude.contains(&p.id.as_str()))
            .map(|config| {
                let performance = self.tracker.snapshot(&config.id);
                let score = score(&config, request, performance.as_ref());
                ScoredProvider { config, score }
            })
            .collect();

        ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
        ranked
    }

    /// Select the best provider for a request (core routing method)
    ///
    /// # Flow
    ///
    /// 1. Filter: active + supports the task + not excluded
    /// 2. Score each remaining provider
    /// 3. Pick the minimum, first-registered on ties
    pub fn select_provider(&self, request: &AiRequest, exclude: &[&str]) -> Result<ScoredProvider> {
        let ranked = self.rank_providers(request, exclude);

        let candidates: Vec<_> = ranked
            .iter()
            .map(|p| (p.config.id.as_str(), p.score))
            .collect();
        debug!(task = %request.task, candidates = ?candidates, "scored providers");

        ranked
            .into_iter()
            .next()
            .ok_or(GatewayError::ProviderUnavailable { task: request.task })
    }
}
