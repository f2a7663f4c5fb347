//! Router core structure
//!
//! The router is an explicitly constructed instance: every caller (and every
//! test) owns its own registry, performance tracker and cost ledger.

use super::config::RouterConfig;
use super::metrics::{PerformanceTracker, ProviderStatus};
use super::registry::ProviderRegistry;
use crate::core::telemetry::TelemetrySink;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// AI request router
///
/// Selects a provider per request, executes the call with a single fallback
/// and records what it observed.
pub struct Router {
    /// Configured providers and their adapters
    pub(crate) registry: Arc<ProviderRegistry>,

    /// Per-provider counters used for scoring
    pub(crate) tracker: Arc<PerformanceTracker>,

    /// Cost of successful calls per provider since the last reset
    pub(crate) cost_ledger: DashMap<String, f64>,

    /// Router configuration
    pub(crate) config: RouterConfig,

    /// Optional telemetry destination
    pub(crate) telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl Router {
    /// Create a router over an already populated registry
    pub fn new(registry: ProviderRegistry, config: RouterConfig) -> Self {
        Self::with_shared_registry(Arc::new(registry), config)
    }

    pub fn with_shared_registry(registry: Arc<ProviderRegistry>, config: RouterConfig) -> Self {
        info!(
            providers = registry.len(),
            call_timeout_secs = config.call_timeout_secs,
            "router initialized"
        );
        Self {
            registry,
            tracker: Arc::new(PerformanceTracker::new()),
            cost_ledger: DashMap::new(),
            config,
            telemetry: None,
        }
    }

    /// Attach a telemetry sink (builder pattern)
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    // ========== Observability ==========

    /// Static attributes and observed performance of every provider
    pub fn get_provider_status(&self) -> BTreeMap<String, ProviderStatus> {
        self.tracker.status_all(&self.registry)
    }

    /// Cost accumulated per provider since the last reset
    pub fn get_cost_tracking(&self) -> BTreeMap<String, f64> {
        self.cost_ledger
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Clear the cost ledger; performance counters are left untouched
    pub fn reset_cost_tracking(&self) {
        self.cost_ledger.clear();
        info!("cost tracking reset");
    }

    pub(crate) fn add_cost(&self, provider_id: &str, cost: f64) {
        *self
            .cost_ledger
            .entry(provider_id.to_string())
            .or_insert(0.0) += cost;
    }

    // ========== Provider Management ==========

    /// Toggle a provider in or out of selection; `false` for unknown ids
    pub fn set_provider_active(&self, provider_id: &str, active: bool) -> bool {
        self.registry.set_active(provider_id, active)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("tracker", &self.tracker)
            .field("config", &self.config)
            .field("telemetry", &self.telemetry.is_some())
            .finish()
    }
}
