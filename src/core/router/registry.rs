//! Provider registry
//!
//! Holds the configured backend providers, their static attributes and the
//! adapter used to reach each of them. Providers are registered at startup
//! and read on every request; the activity flag is the only field that can
//! change afterwards.

use crate::core::providers::ProviderAdapter;
use crate::core::types::{Task, TaskSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Static attributes of one backend provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub model: String,
    pub max_tokens: u32,
    pub cost_per_token: f64,
    pub capabilities: TaskSet,
    pub active: bool,
    /// Lower value = preferred
    pub priority: u32,
}

impl ProviderConfig {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            max_tokens: 4096,
            cost_per_token: 0.0,
            capabilities: TaskSet::empty(),
            active: true,
            priority: 0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_cost_per_token(mut self, cost_per_token: f64) -> Self {
        self.cost_per_token = cost_per_token;
        self
    }

    pub fn with_capabilities(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.capabilities = tasks.into_iter().collect();
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn supports(&self, task: Task) -> bool {
        self.capabilities.contains(task)
    }
}

struct RegisteredProvider {
    config: ProviderConfig,
    active: AtomicBool,
    adapter: Option<Arc<dyn ProviderAdapter>>,
}

impl RegisteredProvider {
    fn snapshot(&self) -> ProviderConfig {
        let mut config = self.config.clone();
        config.active = self.active.load(Ordering::Relaxed);
        config
    }
}

impl fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("config", &self.config)
            .field("active", &self.active.load(Ordering::Relaxed))
            .field("adapter", &self.adapter.as_ref().map(|a| a.name()))
            .finish()
    }
}

/// Registry of providers in registration order
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: RwLock<Vec<RegisteredProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider without an adapter
    ///
    /// Returns `false` (and changes nothing) if the id is already registered.
    pub fn register(&self, config: ProviderConfig) -> bool {
        self.insert(config, None)
    }

    /// Register a provider together with the adapter that executes its calls
    pub fn register_with_adapter(
        &self,
        config: ProviderConfig,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> bool {
        self.insert(config, Some(adapter))
    }

    fn insert(&self, config: ProviderConfig, adapter: Option<Arc<dyn ProviderAdapter>>) -> bool {
        let mut providers = self.providers.write();
        if providers.iter().any(|p| p.config.id == config.id) {
            debug!(provider = %config.id, "provider already registered, ignoring");
            return false;
        }

        info!(
            provider = %config.id,
            model = %config.model,
            priority = config.priority,
            capabilities = ?config.capabilities,
            "registered provider"
        );
        providers.push(RegisteredProvider {
            active: AtomicBool::new(config.active),
            config,
            adapter,
        });
        true
    }

    /// Attach or replace the adapter of an already registered provider
    pub fn attach_adapter(&self, id: &str, adapter: Arc<dyn ProviderAdapter>) -> bool {
        let mut providers = self.providers.write();
        match providers.iter_mut().find(|p| p.config.id == id) {
            Some(provider) => {
                provider.adapter = Some(adapter);
                true
            }
            None => false,
        }
    }

    /// Toggle the activity flag; returns `false` for unknown ids
    pub fn set_active(&self, id: &str, active: bool) -> bool {
        let providers = self.providers.read();
        match providers.iter().find(|p| p.config.id == id) {
            Some(provider) => {
                provider.active.store(active, Ordering::Relaxed);
                info!(provider = %id, active, "provider activation changed");
                true
            }
            None => false,
        }
    }

    /// Active providers whose capability set contains `task`, in registration order
    ///
    /// An empty result is a valid outcome.
    pub fn eligible(&self, task: Task) -> Vec<ProviderConfig> {
        self.providers
            .read()
            .iter()
            .filter(|p| p.active.load(Ordering::Relaxed) && p.config.supports(task))
            .map(RegisteredProvider::snapshot)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<ProviderConfig> {
        self.providers
            .read()
            .iter()
            .find(|p| p.config.id == id)
            .map(RegisteredProvider::snapshot)
    }

    pub fn adapter(&self, id: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.providers
            .read()
            .iter()
            .find(|p| p.config.id == id)
            .and_then(|p| p.adapter.clone())
    }

    /// Every registered provider, active or not
    pub fn all(&self) -> Vec<ProviderConfig> {
        self.providers
            .read()
            .iter()
            .map(RegisteredProvider::snapshot)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}
