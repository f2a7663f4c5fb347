//! Google Gemini provider adapter (`generateContent`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base_provider::{join_url, send_json};
use super::{Completion, CompletionRequest, ProviderAdapter, ProviderError, Usage};

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: u64,
}

#[derive(Debug, Clone)]
pub struct GoogleAdapter {
    api_key: String,
    api_base: String,
    http: Client,
}

impl GoogleAdapter {
    pub fn new(api_key: impl Into<String>, http: Client) -> Self {
        Self::with_api_base(api_key, GOOGLE_API_BASE, http)
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
impl ProviderAdapter for GoogleAdapter {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        debug!(model = %request.model, "gemini generateContent request");

        let body = GenerateContentBody {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let url = join_url(
            &self.api_base,
            &format!("models/{}:generateContent", request.model),
        );
        let builder = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let response: GenerateContentResponse = send_json("google", builder).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default();

        Ok(Completion {
            text,
            usage: Usage {
                total_tokens: response
                    .usage_metadata
                    .map(|u| u.total_token_count)
                    .unwrap_or(0),
            },
            model: request.model,
        })
    }
}
