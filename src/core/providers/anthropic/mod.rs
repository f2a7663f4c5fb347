//! Anthropic provider adapter (Messages API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base_provider::{join_url, send_json};
use super::{Completion, CompletionRequest, ProviderAdapter, ProviderError, Usage};

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    api_key: String,
    api_base: String,
    http: Client,
}

impl AnthropicAdapter {
    pub fn new(api_key: impl Into<String>, http: Client) -> Self {
        Self::with_api_base(api_key, ANTHROPIC_API_BASE, http)
    }

    pub fn with_api_base(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: api_base.into(),
            http,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        debug!(model = %request.model, "anthropic messages request");

        let body = MessagesBody {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let builder = self
            .http
            .post(join_url(&self.api_base, "messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: MessagesResponse = send_json("anthropic", builder).await?;

        let text = response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        let total_tokens = response
            .usage
            .map(|u| u.input_tokens + u.output_tokens)
            .unwrap_or(0);

        Ok(Completion {
            text,
            usage: Usage { total_tokens },
            model: response.model.unwrap_or(request.model),
        })
    }
}
