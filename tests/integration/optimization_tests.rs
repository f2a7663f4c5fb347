//! Optimization layer integration tests
//!
//! The layer wraps a real router over scripted providers plus in-process
//! retrieval and clustering collaborators.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::{ProviderFactory, Script, ScriptedAdapter, router_with};
    use adaptive_router::config::OptimizationConfig;
    use adaptive_router::core::optimizer::Optimization;
    use adaptive_router::core::retrieval::{
        Citation, Cluster, ClusteringOutcome, RetrievalOptions,
    };
    use adaptive_router::{
        AiRequestOptions, Clusterer, ClusteringOptions, DataPoint, OptimizationLayer,
        ProviderAdapter, ProviderError, QueryOptions, RetrievalPipeline, RetrievalResult, Result,
        Task,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    /// Answers every query with one citation per allowed result
    #[derive(Default)]
    struct EchoPipeline {
        calls: Mutex<Vec<(String, RetrievalOptions)>>,
    }

    impl EchoPipeline {
        fn calls(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl RetrievalPipeline for EchoPipeline {
        async fn retrieve_and_generate(
            &self,
            query: &str,
            options: &RetrievalOptions,
        ) -> Result<RetrievalResult> {
            self.calls.lock().push((query.to_string(), options.clone()));
            let citations = (0..options.limit.min(3))
                .map(|n| Citation {
                    url: format!("https://docs.example.com/{}", n),
                    title: format!("doc {}", n),
                    source: "docs".to_string(),
                    published_at: None,
                    relevance_score: options.threshold,
                })
                .collect();
            Ok(RetrievalResult {
                answer: format!("answer to {}", query),
                citations,
                context: vec![query.to_string()],
            })
        }
    }

    /// Silhouette score looked up by k
    struct TableClusterer {
        optimal_k: usize,
        scores: BTreeMap<usize, f64>,
    }

    #[async_trait]
    impl Clusterer for TableClusterer {
        async fn find_optimal_k(&self, _points: &[DataPoint], max_k: usize) -> Result<usize> {
            Ok(self.optimal_k.min(max_k))
        }

        async fn cluster(&self, points: &[DataPoint], k: usize) -> Result<ClusteringOutcome> {
            let clusters = (0..k)
                .map(|n| Cluster {
                    id: format!("cluster-{}", n),
                    centroid: vec![n as f64],
                    members: points
                        .iter()
                        .skip(n)
                        .step_by(k)
                        .map(|p| p.id.clone())
                        .collect(),
                    inertia: 1.0,
                })
                .collect();
            Ok(ClusteringOutcome {
                clusters,
                silhouette_score: self.scores.get(&k).copied(),
            })
        }
    }

    fn points(n: usize) -> Vec<DataPoint> {
        (0..n)
            .map(|i| DataPoint::new(format!("p{}", i), vec![i as f64, (i * i) as f64]))
            .collect()
    }

    fn layer_over(adapter: Arc<dyn ProviderAdapter>, cost_per_token: f64) -> OptimizationLayer {
        let router = router_with(vec![(
            ProviderFactory::text(adapter.name(), 1, cost_per_token),
            adapter,
        )]);
        OptimizationLayer::new(Arc::new(router), OptimizationConfig::default()).unwrap()
    }

    /// Poor hit rate over enough queries raises the cache TTL
    #[tokio::test]
    async fn test_low_hit_rate_raises_cache_ttl() {
        let pipeline = Arc::new(EchoPipeline::default());
        let layer = layer_over(ScriptedAdapter::replying("alpha", "ok", 1), 0.0)
            .with_retrieval(pipeline.clone());
        let before = layer.get_config().caching.ttl;

        for n in 0..12 {
            let response = layer
                .optimized_query(&format!("question {}", n), QueryOptions::default())
                .await
                .unwrap();
            assert!(!response.metadata.cache_hit);
        }
        assert_eq!(pipeline.calls(), 12);

        let analytics = layer.get_performance_analytics();
        assert_eq!(analytics.rag_queries.total_queries, 12);
        assert_approx_eq!(analytics.rag_queries.cache_hit_rate, 0.0);
        assert!(
            analytics
                .recommendations
                .iter()
                .any(|r| r.component == "RAG Pipeline")
        );

        let report = layer.auto_optimize().await.unwrap();
        let after = layer.get_config().caching.ttl;
        assert!(after > before);
        assert_eq!(report.new_config.caching.ttl, after);
        assert!(
            report
                .optimizations
                .iter()
                .any(|o| o.component == "Caching" && o.action.contains(&after.to_string()))
        );
        assert_eq!(layer.cache().default_ttl(), Duration::from_secs(after));
    }

    #[tokio::test]
    async fn test_repeated_queries_are_served_from_cache() {
        let pipeline = Arc::new(EchoPipeline::default());
        let layer = layer_over(ScriptedAdapter::replying("alpha", "ok", 1), 0.0)
            .with_retrieval(pipeline.clone());

        let first = layer
            .optimized_query("what changed?", QueryOptions::default().with_limit(50))
            .await
            .unwrap();
        assert!(
            first
                .metadata
                .optimizations
                .contains(&Optimization::ParameterOptimization)
        );
        assert!(first.metadata.optimizations.contains(&Optimization::ResultCached));

        for _ in 0..3 {
            let again = layer
                .optimized_query("what changed?", QueryOptions::default().with_limit(50))
                .await
                .unwrap();
            assert!(again.metadata.cache_hit);
            assert_eq!(again.result, first.result);
        }

        assert_eq!(pipeline.calls(), 1);
        // Limit capped at the configured max_results
        assert_eq!(pipeline.calls.lock()[0].1.limit, 10);

        let analytics = layer.get_performance_analytics();
        assert_eq!(analytics.rag_queries.total_queries, 4);
        assert_approx_eq!(analytics.rag_queries.cache_hit_rate, 0.75);
        assert!(analytics.recommendations.is_empty());
    }

    /// A failed request is retried once with a smaller request
    #[tokio::test]
    async fn test_simplified_retry_recovers() {
        let adapter = Arc::new(
            ScriptedAdapter::new("solo", Script::reply("recovered", 20))
                .then(Script::Fail(ProviderError::api_error("solo", 500, "overloaded"))),
        );
        let layer = layer_over(adapter.clone(), 0.00001);

        let response = layer
            .optimized_ai_request("hello", Task::TextGeneration, AiRequestOptions::default())
            .await
            .unwrap();

        assert_eq!(response.content, "recovered");
        assert!(response.metadata.fallback_used);
        assert_eq!(
            response.metadata.optimizations,
            vec![
                Optimization::RequestOptimization,
                Optimization::FallbackAttempted
            ]
        );

        let requests = adapter.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].max_tokens, 1000);
        assert_eq!(requests[1].max_tokens, 500);

        let analytics = layer.get_performance_analytics();
        assert_eq!(analytics.ai_requests.total_requests, 1);
        assert_approx_eq!(analytics.ai_requests.success_rate, 1.0);
        assert_eq!(analytics.ai_requests.provider_distribution["solo"], 1);
    }

    #[tokio::test]
    async fn test_cost_threshold_tracks_average_cost() {
        let layer = layer_over(ScriptedAdapter::replying("pricey", "ok", 500), 0.001);

        for _ in 0..3 {
            layer
                .optimized_ai_request("hello", Task::Summarization, AiRequestOptions::default())
                .await
                .unwrap();
        }

        let analytics = layer.get_performance_analytics();
        assert_approx_eq!(analytics.ai_requests.cost_per_request, 0.5);
        assert!(
            analytics
                .recommendations
                .iter()
                .any(|r| r.component == "AI Router")
        );

        let report = layer.auto_optimize().await.unwrap();
        assert_approx_eq!(report.new_config.ai_routing.cost_threshold, 0.4);
        assert_eq!(report.optimizations.len(), 1);
        assert_eq!(
            report.optimizations[0].action,
            "Adjusted cost threshold to $0.400"
        );
    }

    #[tokio::test]
    async fn test_poor_clustering_searches_other_k() {
        let clusterer = Arc::new(TableClusterer {
            optimal_k: 3,
            scores: BTreeMap::from([(2, 0.2), (3, 0.1), (4, 0.45), (5, 0.3)]),
        });
        let layer = layer_over(ScriptedAdapter::replying("alpha", "ok", 1), 0.0)
            .with_clusterer(clusterer);

        let report = layer
            .optimized_clustering(&points(10), ClusteringOptions::default())
            .await
            .unwrap();

        assert_eq!(report.metrics.optimal_k, 4);
        assert_eq!(report.clusters.len(), 4);
        assert_approx_eq!(report.metrics.silhouette_score, 0.45);
        assert_eq!(
            report.optimizations,
            vec![
                Optimization::AutoKOptimization,
                Optimization::QualityReoptimization
            ]
        );

        // Average quality 0.45 relaxes the 0.5 threshold
        let tuned = layer.auto_optimize().await.unwrap();
        assert_approx_eq!(tuned.new_config.clustering.quality_threshold, 0.35);
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_previous_config() {
        let layer = layer_over(ScriptedAdapter::replying("alpha", "ok", 1), 0.0);
        let before = layer.get_config();

        let mut invalid = before.clone();
        invalid.caching.ttl = 10;
        assert!(layer.update_config(invalid).is_err());
        assert_eq!(layer.get_config(), before);

        let mut smaller = before.clone();
        smaller.caching.max_size = 200;
        layer.update_config(smaller).unwrap();
        assert_eq!(layer.cache().capacity(), 200);
    }
}
