//! Provider and router fixtures

use adaptive_router::{
    ProviderAdapter, ProviderConfig, ProviderRegistry, Router, RouterConfig, Task,
};
use std::sync::Arc;

/// Factory for provider configurations
pub struct ProviderFactory;

impl ProviderFactory {
    /// Text-generation provider with the given priority and per-token cost
    pub fn text(id: &str, priority: u32, cost_per_token: f64) -> ProviderConfig {
        ProviderConfig::new(id, format!("{}-model", id))
            .with_max_tokens(4096)
            .with_cost_per_token(cost_per_token)
            .with_capabilities([Task::TextGeneration, Task::Summarization])
            .with_priority(priority)
    }

    /// Provider that only handles `task`
    pub fn only(id: &str, task: Task) -> ProviderConfig {
        ProviderConfig::new(id, format!("{}-model", id)).with_capabilities([task])
    }
}

/// Router over the given providers, registered in order
pub fn router_with(providers: Vec<(ProviderConfig, Arc<dyn ProviderAdapter>)>) -> Router {
    router_with_config(providers, RouterConfig::default())
}

pub fn router_with_config(
    providers: Vec<(ProviderConfig, Arc<dyn ProviderAdapter>)>,
    config: RouterConfig,
) -> Router {
    let registry = ProviderRegistry::new();
    for (provider, adapter) in providers {
        registry.register_with_adapter(provider, adapter);
    }
    Router::new(registry, config)
}
