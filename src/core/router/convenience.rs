//! Convenience wrappers around [`Router::execute`] for common tasks

use super::router::Router;
use crate::core::types::{AiRequest, AiResponse, RequestPriority, Task};
use crate::utils::error::Result;

impl Router {
    /// Plain text generation at medium priority
    pub async fn generate(&self, prompt: impl Into<String>) -> Result<AiResponse> {
        self.execute(AiRequest::new(prompt, Task::TextGeneration))
            .await
    }

    /// Classify `text` into one of `categories`; returns the trimmed label
    pub async fn classify(&self, text: &str, categories: &[&str]) -> Result<String> {
        let prompt = format!(
            "Classify the following text into one of these categories: {}\n\nText: {}\n\nCategory:",
            categories.join(", "),
            text
        );
        let request = AiRequest::new(prompt, Task::Classification)
            .with_temperature(0.1)
            .with_max_tokens(50);

        let response = self.execute(request).await?;
        Ok(response.content.trim().to_string())
    }

    /// Summarize `text` in at most `max_length` words
    pub async fn summarize(&self, text: &str, max_length: u32) -> Result<String> {
        let prompt = format!(
            "Summarize the following text in {} words or less:\n\n{}",
            max_length, text
        );
        let request = AiRequest::new(prompt, Task::Summarization)
            .with_temperature(0.3)
            .with_max_tokens(max_length.saturating_mul(2));

        Ok(self.execute(request).await?.content)
    }

    /// High-priority reasoning over `prompt` with optional context
    pub async fn analyze(&self, prompt: &str, context: Option<&str>) -> Result<AiResponse> {
        let prompt = match context {
            Some(context) => format!("Context: {}\n\nAnalysis request: {}", context, prompt),
            None => prompt.to_string(),
        };
        let request = AiRequest::new(prompt, Task::Reasoning)
            .with_priority(RequestPriority::High)
            .with_temperature(0.2);

        self.execute(request).await
    }
}
