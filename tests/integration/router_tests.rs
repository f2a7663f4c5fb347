//! Router integration tests
//!
//! Selection, fallback and performance tracking through the public API.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::assertions::GatewayErrorAssertions;
    use crate::common::fixtures::router_with_config;
    use crate::common::{ProviderFactory, Script, ScriptedAdapter, router_with};
    use adaptive_router::core::telemetry::MemoryTelemetrySink;
    use adaptive_router::{
        AiRequest, GatewayError, ProviderAdapter, ProviderError, RouterConfig, Task,
    };
    use futures::future::join_all;
    use std::sync::Arc;
    use std::time::Duration;

    fn text(prompt: &str) -> AiRequest {
        AiRequest::new(prompt, Task::TextGeneration)
    }

    /// A lone provider that times out: one fallback search, nothing found
    #[tokio::test(start_paused = true)]
    async fn test_single_provider_timeout_reports_fallback_unavailable() {
        let solo = ScriptedAdapter::hanging("solo");
        let router = router_with_config(
            vec![(
                ProviderFactory::text("solo", 1, 0.00001),
                solo.clone() as Arc<dyn ProviderAdapter>,
            )],
            RouterConfig::default().with_call_timeout_secs(5),
        );

        let err = router.execute(text("hello")).await.unwrap_err();
        err.assert_code("AI_PROVIDER_FALLBACK_UNAVAILABLE");
        assert_eq!(err.http_status(), 503);
        assert_eq!(err.attempted_providers(), vec!["solo".to_string()]);

        match err {
            GatewayError::ProviderFallbackUnavailable {
                primary, fallback, ..
            } => {
                assert!(matches!(
                    *primary,
                    GatewayError::ProviderTransport(ProviderError::Timeout { .. })
                ));
                assert!(fallback.is_none());
            }
            other => panic!("unexpected error: {}", other),
        }

        assert_eq!(solo.calls(), 1);
        let record = router.tracker().snapshot("solo").unwrap();
        assert_eq!(record.total_requests, 1);
        assert_eq!(record.successful_requests, 0);
    }

    /// Primary fails, secondary answers, caller sees a normal response
    #[tokio::test]
    async fn test_fallback_success_is_transparent() {
        let primary = ScriptedAdapter::failing("primary");
        let secondary = ScriptedAdapter::replying("secondary", "from secondary", 40);
        let router = router_with(vec![
            (
                ProviderFactory::text("primary", 1, 0.00001),
                primary.clone() as Arc<dyn ProviderAdapter>,
            ),
            (
                ProviderFactory::text("secondary", 2, 0.00001),
                secondary.clone() as Arc<dyn ProviderAdapter>,
            ),
        ]);

        let response = router.execute(text("hello")).await.unwrap();
        assert_eq!(response.provider, "secondary");
        assert_eq!(response.content, "from secondary");
        assert_eq!(response.tokens_used, 40);
        assert_approx_eq!(response.cost, 40.0 * 0.00001);

        let primary_record = router.tracker().snapshot("primary").unwrap();
        assert_eq!(primary_record.total_requests, 1);
        assert_eq!(primary_record.successful_requests, 0);

        let secondary_record = router.tracker().snapshot("secondary").unwrap();
        assert_eq!(secondary_record.total_requests, 1);
        assert_eq!(secondary_record.successful_requests, 1);

        // Only successful calls reach the cost ledger
        let costs = router.get_cost_tracking();
        assert!(!costs.contains_key("primary"));
        assert_approx_eq!(costs["secondary"], 40.0 * 0.00001);
    }

    #[tokio::test]
    async fn test_both_providers_failing_carries_both_causes() {
        let router = router_with(vec![
            (
                ProviderFactory::text("a", 1, 0.0),
                ScriptedAdapter::failing("a") as Arc<dyn ProviderAdapter>,
            ),
            (
                ProviderFactory::text("b", 2, 0.0),
                Arc::new(ScriptedAdapter::new(
                    "b",
                    Script::Fail(ProviderError::rate_limit("b", Some(3))),
                )) as Arc<dyn ProviderAdapter>,
            ),
        ]);

        let err = router.execute(text("hello")).await.unwrap_err();
        assert_eq!(err.attempted_providers(), vec!["a".to_string(), "b".to_string()]);
        match err {
            GatewayError::ProviderFallbackUnavailable {
                primary, fallback, ..
            } => {
                assert!(matches!(
                    *primary,
                    GatewayError::ProviderTransport(ProviderError::Network { .. })
                ));
                let fallback = fallback.expect("fallback cause");
                assert!(matches!(
                    *fallback,
                    GatewayError::ProviderTransport(ProviderError::RateLimit {
                        retry_after: Some(3),
                        ..
                    })
                ));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    /// Any task with a capable active provider is always routable
    #[tokio::test]
    async fn test_every_task_with_a_capable_provider_is_routable() {
        for task in Task::ALL {
            let router = router_with(vec![(
                ProviderFactory::only("only", task),
                ScriptedAdapter::replying("only", "ok", 1) as Arc<dyn ProviderAdapter>,
            )]);

            let response = router.execute(AiRequest::new("x", task)).await;
            assert!(response.is_ok(), "task {} was not routable", task);
        }
    }

    #[tokio::test]
    async fn test_no_capable_provider_is_unavailable() {
        let router = router_with(vec![(
            ProviderFactory::only("embedder", Task::Embeddings),
            ScriptedAdapter::replying("embedder", "ok", 1) as Arc<dyn ProviderAdapter>,
        )]);

        let err = router
            .execute(AiRequest::new("x", Task::Translation))
            .await
            .unwrap_err();
        err.assert_code("AI_PROVIDER_UNAVAILABLE");
        assert_eq!(err.http_status(), 503);
    }

    /// A provider that keeps failing stops being chosen once an alternative has successes
    #[tokio::test]
    async fn test_failing_provider_is_displaced() {
        let flaky = ScriptedAdapter::failing("flaky");
        let steady = ScriptedAdapter::replying("steady", "ok", 10);
        let router = router_with(vec![
            (
                ProviderFactory::text("flaky", 1, 0.0),
                flaky.clone() as Arc<dyn ProviderAdapter>,
            ),
            (
                ProviderFactory::text("steady", 2, 0.0),
                steady.clone() as Arc<dyn ProviderAdapter>,
            ),
        ]);

        let mut previous_rate = 1.0;
        for _ in 0..5 {
            let response = router.execute(text("hello")).await.unwrap();
            assert_eq!(response.provider, "steady");

            let rate = router.tracker().snapshot("flaky").unwrap().success_rate;
            assert!(rate <= previous_rate);
            previous_rate = rate;
        }

        // Tried once as primary, then always outscored
        assert_eq!(flaky.calls(), 1);
        assert_eq!(steady.calls(), 5);
    }

    /// Over budget everywhere still serves the request
    #[tokio::test]
    async fn test_budget_is_soft() {
        let router = router_with(vec![
            (
                ProviderFactory::text("pricey", 1, 0.001),
                ScriptedAdapter::replying("pricey", "expensive", 10) as Arc<dyn ProviderAdapter>,
            ),
            (
                ProviderFactory::text("pricier", 2, 0.002),
                ScriptedAdapter::replying("pricier", "more expensive", 10)
                    as Arc<dyn ProviderAdapter>,
            ),
        ]);

        let request = text("hello").with_max_tokens(1000).with_budget(0.0001);
        let ranked = router.rank_providers(&request, &[]);
        assert_approx_eq!(ranked[0].score, 10.0 + 0.001 * 1e6 + 1000.0);

        let response = router.execute(request).await.unwrap();
        assert_eq!(response.provider, "pricey");
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_all_recorded() {
        let router = Arc::new(router_with(vec![(
            ProviderFactory::text("alpha", 1, 0.00001),
            ScriptedAdapter::replying("alpha", "ok", 100) as Arc<dyn ProviderAdapter>,
        )]));

        let calls = (0..64).map(|n| {
            let router = router.clone();
            async move { router.execute(text(&format!("prompt {}", n))).await }
        });
        let results = join_all(calls).await;
        assert!(results.iter().all(|r| r.is_ok()));

        let record = router.tracker().snapshot("alpha").unwrap();
        assert_eq!(record.total_requests, 64);
        assert_eq!(record.successful_requests, 64);
        assert_approx_eq!(router.get_cost_tracking()["alpha"], 64.0 * 100.0 * 0.00001);
    }

    #[tokio::test]
    async fn test_spawned_requests_avoid_failing_provider() {
        let router = Arc::new(router_with(vec![
            (
                ProviderFactory::text("alpha", 1, 0.0),
                ScriptedAdapter::failing("alpha") as Arc<dyn ProviderAdapter>,
            ),
            (
                ProviderFactory::text("beta", 2, 0.0),
                ScriptedAdapter::replying("beta", "ok", 1) as Arc<dyn ProviderAdapter>,
            ),
        ]));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let router = router.clone();
                tokio::spawn(async move { router.execute(text("hello")).await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().provider, "beta");
        }

        let alpha = router.tracker().snapshot("alpha").unwrap();
        let beta = router.tracker().snapshot("beta").unwrap();
        // Every alpha attempt failed and was followed by exactly one beta success
        assert_eq!(alpha.successful_requests, 0);
        assert_eq!(beta.successful_requests, 16);
        assert!(alpha.total_requests >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_measured() {
        let slow = Arc::new(ScriptedAdapter::new(
            "slow",
            Script::Slow {
                delay: Duration::from_millis(1500),
                tokens: 5,
            },
        ));
        let router = router_with(vec![(
            ProviderFactory::text("slow", 1, 0.0),
            slow as Arc<dyn ProviderAdapter>,
        )]);

        let response = router.execute(text("hello")).await.unwrap();
        assert!(response.latency >= Duration::from_millis(1500));

        let record = router.tracker().snapshot("slow").unwrap();
        assert!(record.avg_latency_ms >= 1500.0);
    }

    #[tokio::test]
    async fn test_telemetry_reports_final_outcome() {
        let sink = Arc::new(MemoryTelemetrySink::new());
        let router = router_with(vec![
            (
                ProviderFactory::text("alpha", 1, 0.0),
                ScriptedAdapter::failing("alpha") as Arc<dyn ProviderAdapter>,
            ),
            (
                ProviderFactory::text("beta", 2, 0.0),
                ScriptedAdapter::replying("beta", "ok", 1) as Arc<dyn ProviderAdapter>,
            ),
        ])
        .with_telemetry(sink.clone());

        let response = router
            .execute(text("hello").with_strategy("cheapest").with_telemetry(true))
            .await
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].success);
        assert_eq!(events[0].provider.as_deref(), Some("beta"));
        assert_eq!(response.telemetry_id, Some(events[0].id));

        // Telemetry disabled on the request: nothing recorded
        router.execute(text("again")).await.unwrap();
        assert_eq!(sink.events().len(), 1);
    }
}
