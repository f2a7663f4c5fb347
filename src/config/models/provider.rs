//! Provider configuration

use super::*;
use crate::core::providers::ProviderKind;
use crate::core::router::registry::ProviderConfig;
use crate::core::types::TaskSet;
use serde::{Deserialize, Serialize};

/// Per-provider overrides on top of the built-in preset
///
/// Unset fields keep the preset value. The API key falls back to the
/// provider's credential environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider type (openai, anthropic, google, mistral)
    pub kind: ProviderKind,
    /// API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub cost_per_token: Option<f64>,
    #[serde(default)]
    pub capabilities: Option<TaskSet>,
    #[serde(default)]
    pub priority: Option<u32>,
    /// Whether provider starts active
    #[serde(default = "default_true")]
    pub active: bool,
}

impl ProviderSettings {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            api_base: None,
            model: None,
            max_tokens: None,
            cost_per_token: None,
            capabilities: None,
            priority: None,
            active: true,
        }
    }

    /// Overlay these settings on `preset`
    pub fn apply_to(&self, mut preset: ProviderConfig) -> ProviderConfig {
        if let Some(model) = &self.model {
            preset.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            preset.max_tokens = max_tokens;
        }
        if let Some(cost) = self.cost_per_token {
            preset.cost_per_token = cost;
        }
        if let Some(capabilities) = self.capabilities {
            preset.capabilities = capabilities;
        }
        if let Some(priority) = self.priority {
            preset.priority = priority;
        }
        preset.active = self.active;
        preset
    }
}
