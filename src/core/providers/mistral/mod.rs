//! Mistral AI provider adapter
//!
//! Mistral serves the OpenAI-compatible chat format, so this is a thin
//! wrapper over the shared client with a different base URL.

use async_trait::async_trait;
use reqwest::Client;

use super::base_provider::OpenAICompatibleClient;
use super::{Completion, CompletionRequest, ProviderAdapter, ProviderError};

pub const MISTRAL_API_BASE: &str = "https://api.mistral.ai/v1";

#[derive(Debug, Clone)]
pub struct MistralAdapter {
    client: OpenAICompatibleClient,
}

impl MistralAdapter {
    pub fn new(api_key: impl Into<String>, http: Client) -> Self {
        Self::with_api_base(api_key, MISTRAL_API_BASE, http)
    }

    pub fn with_api_base(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            client: OpenAICompatibleClient::new("mistral", api_key, api_base, http),
        }
    }
}

#[async_trait]
impl ProviderAdapter for MistralAdapter {
    fn name(&self) -> &'static str {
        "mistral"
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        self.client.generate_completion(request).await
    }
}
