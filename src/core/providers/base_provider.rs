//! Base provider module
//!
//! Shared HTTP plumbing for the adapters and the OpenAI-compatible wire
//! format used by both OpenAI and Mistral.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{Completion, CompletionRequest, ProviderAdapter, ProviderError, Usage};

/// Build the HTTP client shared by all adapters
pub fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::configuration("http", e.to_string()))
}

/// Join a base URL and a path without doubling slashes
pub fn join_url(api_base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Send a request and decode a JSON body, mapping failures to [`ProviderError`]
pub async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    builder: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        return Err(ProviderError::rate_limit(provider, retry_after));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::from_status(provider, status.as_u16(), body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::response_parsing(provider, e.to_string()))
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

/// Client for any `/chat/completions` endpoint speaking the OpenAI format
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    provider: &'static str,
    api_key: String,
    api_base: String,
    http: Client,
}

impl OpenAICompatibleClient {
    pub fn new(
        provider: &'static str,
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            api_base: api_base.into(),
            http,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAICompatibleClient {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        debug!(provider = self.provider, model = %request.model, "chat completion request");

        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let builder = self
            .http
            .post(join_url(&self.api_base, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: ChatCompletionResponse = send_json(self.provider, builder).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(Completion {
            text,
            usage: Usage {
                total_tokens: response.usage.map(|u| u.total_tokens).unwrap_or(0),
            },
            model: response.model.unwrap_or(request.model),
        })
    }
}
