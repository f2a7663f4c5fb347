//! Provider adapter integration tests
//!
//! Each adapter talks to a local mock server standing in for the vendor API.

#[cfg(test)]
mod tests {
    use adaptive_router::config::ProviderSettings;
    use adaptive_router::core::providers::CompletionRequest;
    use adaptive_router::{
        AiRequest, AnthropicAdapter, GoogleAdapter, MistralAdapter, OpenAIAdapter,
        ProviderAdapter, ProviderError, ProviderKind, ProviderRegistry, Router, RouterConfig,
        Task,
    };
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: "Say hi".to_string(),
            model: model.to_string(),
            max_tokens: 64,
            temperature: 0.2,
        }
    }

    fn chat_completion(model: &str, text: &str, tokens: u64) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "model": model,
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": tokens - 3, "total_tokens": tokens}
        })
    }

    #[tokio::test]
    async fn test_openai_chat_completions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "max_tokens": 64,
                "messages": [{"role": "user", "content": "Say hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(
                "gpt-4-0613",
                "hi",
                12,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = OpenAIAdapter::with_api_base("sk-test", server.uri(), Client::new());
        let completion = adapter.generate_completion(request("gpt-4")).await.unwrap();

        assert_eq!(completion.text, "hi");
        assert_eq!(completion.usage.total_tokens, 12);
        assert_eq!(completion.model, "gpt-4-0613");
    }

    #[tokio::test]
    async fn test_mistral_uses_openai_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer mistral-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(
                "mistral-large-latest",
                "bonjour",
                9,
            )))
            .expect(1)
            .mount(&server)
            .await;

        // Trailing slash on the base is tolerated
        let base = format!("{}/v1/", server.uri());
        let adapter = MistralAdapter::with_api_base("mistral-key", base, Client::new());
        let completion = adapter
            .generate_completion(request("mistral-large-latest"))
            .await
            .unwrap();

        assert_eq!(adapter.name(), "mistral");
        assert_eq!(completion.text, "bonjour");
        assert_eq!(completion.usage.total_tokens, 9);
    }

    #[tokio::test]
    async fn test_anthropic_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "ant-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-sonnet-20240229",
                "max_tokens": 64,
                "messages": [{"role": "user", "content": "Say hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_1",
                "type": "message",
                "model": "claude-3-sonnet-20240229",
                "content": [{"type": "text", "text": "hello there"}],
                "usage": {"input_tokens": 10, "output_tokens": 5}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = AnthropicAdapter::with_api_base("ant-key", server.uri(), Client::new());
        let completion = adapter
            .generate_completion(request("claude-3-sonnet-20240229"))
            .await
            .unwrap();

        assert_eq!(completion.text, "hello there");
        // Input and output tokens are both billed
        assert_eq!(completion.usage.total_tokens, 15);
    }

    #[tokio::test]
    async fn test_google_generate_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(query_param("key", "g-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Say hi"}]}],
                "generationConfig": {"maxOutputTokens": 64}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "hey"}]}}],
                "usageMetadata": {
                    "promptTokenCount": 2,
                    "candidatesTokenCount": 1,
                    "totalTokenCount": 3
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = GoogleAdapter::with_api_base("g-key", server.uri(), Client::new());
        let completion = adapter
            .generate_completion(request("gemini-pro"))
            .await
            .unwrap();

        assert_eq!(completion.text, "hey");
        assert_eq!(completion.usage.total_tokens, 3);
        assert_eq!(completion.model, "gemini-pro");
    }

    async fn openai_error(response: ResponseTemplate) -> ProviderError {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(response)
            .mount(&server)
            .await;

        OpenAIAdapter::with_api_base("sk-test", server.uri(), Client::new())
            .generate_completion(request("gpt-4"))
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let err = openai_error(ResponseTemplate::new(401).set_body_string("bad key")).await;
        assert!(matches!(err, ProviderError::Authentication { provider: "openai", .. }));
        assert_eq!(err.http_status(), 401);
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let err = openai_error(
            ResponseTemplate::new(429).insert_header("retry-after", "7"),
        )
        .await;
        assert!(matches!(
            err,
            ProviderError::RateLimit {
                retry_after: Some(7),
                ..
            }
        ));
        assert_eq!(err.http_status(), 429);
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let err = openai_error(ResponseTemplate::new(500).set_body_string("boom")).await;
        match err {
            ProviderError::ApiError {
                status, message, ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parsing_error() {
        let err = openai_error(ResponseTemplate::new(200).set_body_string("not json")).await;
        assert!(matches!(err, ProviderError::ResponseParsing { .. }));
        assert_eq!(err.http_status(), 502);
    }

    /// Credentials decide which providers exist; the router then reaches them over HTTP
    #[tokio::test]
    async fn test_registry_from_credentials_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "ant-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "claude-3-sonnet-20240229",
                "content": [{"type": "text", "text": "routed"}],
                "usage": {"input_tokens": 60, "output_tokens": 40}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut anthropic = ProviderSettings::new(ProviderKind::Anthropic);
        anthropic.api_base = Some(server.uri());

        let registry = ProviderRegistry::from_credentials(
            |name| (name == "ANTHROPIC_API_KEY").then(|| "ant-key".to_string()),
            &[anthropic],
            Client::new(),
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.get("openai").is_none());

        let router = Router::new(registry, RouterConfig::default());
        let response = router
            .execute(AiRequest::new("Route me", Task::Analysis))
            .await
            .unwrap();

        assert_eq!(response.provider, "anthropic");
        assert_eq!(response.content, "routed");
        assert_eq!(response.tokens_used, 100);
        assert!((response.cost - 100.0 * 0.000015).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_blank_credentials_are_skipped() {
        let registry = ProviderRegistry::from_credentials(
            |name| match name {
                "OPENAI_API_KEY" => Some("   ".to_string()),
                "MISTRAL_API_KEY" => Some("m-key".to_string()),
                _ => None,
            },
            &[],
            Client::new(),
        );

        let ids: Vec<String> = registry.all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["mistral".to_string()]);
    }
}
