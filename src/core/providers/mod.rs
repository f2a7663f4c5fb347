//! Provider adapters
//!
//! Every backend AI service is reached through the [`ProviderAdapter`] trait.
//! The router keeps a map of provider id to adapter, so adding a backend
//! never touches the dispatcher.

pub mod anthropic;
pub mod base_provider;
pub mod gemini;
pub mod mistral;
pub mod openai;
pub mod presets;
pub mod unified_provider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use anthropic::AnthropicAdapter;
pub use gemini::GoogleAdapter;
pub use mistral::MistralAdapter;
pub use openai::OpenAIAdapter;
pub use presets::ProviderKind;
pub use unified_provider::ProviderError;

/// Parameters for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub total_tokens: u64,
}

/// Raw adapter output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
    pub model: String,
}

/// Contract implemented once per backend
///
/// Implementations perform exactly one network call and never retry;
/// timeouts and fallback are the router's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Short provider name used in errors and logs
    fn name(&self) -> &'static str;

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError>;
}
