//! Built-in provider kinds and their default configuration

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{
    AnthropicAdapter, GoogleAdapter, MistralAdapter, OpenAIAdapter, ProviderAdapter,
    anthropic::ANTHROPIC_API_BASE, gemini::GOOGLE_API_BASE, mistral::MISTRAL_API_BASE,
    openai::OPENAI_API_BASE,
};
use crate::core::router::registry::ProviderConfig;
use crate::core::types::Task;

/// Backend services the router knows how to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Google,
    Mistral,
}

impl ProviderKind {
    /// Registration order at startup
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::Mistral,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Mistral => "mistral",
        }
    }

    /// Environment variable whose presence enables this provider
    pub fn credential_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Google => "GOOGLE_API_KEY",
            ProviderKind::Mistral => "MISTRAL_API_KEY",
        }
    }

    pub fn default_api_base(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => OPENAI_API_BASE,
            ProviderKind::Anthropic => ANTHROPIC_API_BASE,
            ProviderKind::Google => GOOGLE_API_BASE,
            ProviderKind::Mistral => MISTRAL_API_BASE,
        }
    }

    /// Static attributes registered when no override is configured
    pub fn preset(&self) -> ProviderConfig {
        let common = [Task::TextGeneration, Task::Reasoning, Task::Analysis];
        match self {
            ProviderKind::OpenAI => ProviderConfig::new(self.id(), "gpt-4")
                .with_max_tokens(8192)
                .with_cost_per_token(0.00003)
                .with_capabilities(common.into_iter().chain([Task::Creative]))
                .with_priority(1),
            ProviderKind::Anthropic => ProviderConfig::new(self.id(), "claude-3-sonnet-20240229")
                .with_max_tokens(4096)
                .with_cost_per_token(0.000015)
                .with_capabilities(common)
                .with_priority(2),
            ProviderKind::Google => ProviderConfig::new(self.id(), "gemini-pro")
                .with_max_tokens(8192)
                .with_cost_per_token(0.00001)
                .with_capabilities(common)
                .with_priority(3),
            ProviderKind::Mistral => ProviderConfig::new(self.id(), "mistral-large-latest")
                .with_max_tokens(32768)
                .with_cost_per_token(0.000007)
                .with_capabilities(common)
                .with_priority(4),
        }
    }

    pub fn build_adapter(
        &self,
        api_key: &str,
        api_base: Option<&str>,
        http: Client,
    ) -> Arc<dyn ProviderAdapter> {
        let api_base = api_base.unwrap_or(self.default_api_base());
        match self {
            ProviderKind::OpenAI => Arc::new(OpenAIAdapter::with_api_base(api_key, api_base, http)),
            ProviderKind::Anthropic => {
                Arc::new(AnthropicAdapter::with_api_base(api_key, api_base, http))
            }
            ProviderKind::Google => Arc::new(GoogleAdapter::with_api_base(api_key, api_base, http)),
            ProviderKind::Mistral => {
                Arc::new(MistralAdapter::with_api_base(api_key, api_base, http))
            }
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
