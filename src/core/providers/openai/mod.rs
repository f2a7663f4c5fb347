//! OpenAI provider adapter

use async_trait::async_trait;
use reqwest::Client;

use super::base_provider::OpenAICompatibleClient;
use super::{Completion, CompletionRequest, ProviderAdapter, ProviderError};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Adapter for the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAIAdapter {
    client: OpenAICompatibleClient,
}

impl OpenAIAdapter {
    pub fn new(api_key: impl Into<String>, http: Client) -> Self {
        Self::with_api_base(api_key, OPENAI_API_BASE, http)
    }

    pub fn with_api_base(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            client: OpenAICompatibleClient::new("openai", api_key, api_base, http),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        self.client.generate_completion(request).await
    }
}
