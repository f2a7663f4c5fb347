//! Optimization wrapper around the router and retrieval collaborators

use super::rules::AutoOptimizer;
use super::samples::{AiRequestSample, ClusteringSample, PerformanceLog, QuerySample};
use super::types::*;
use crate::config::{
    AiRoutingConfig, MAX_CLUSTERS_RANGE, OptimizationConfig, Validate, VectorSearchConfig,
};
use crate::core::cache_manager::{CacheConfig, CacheKey, CacheManager};
use crate::core::retrieval::{
    Clusterer, ClusteringOutcome, DataPoint, RetrievalOptions, RetrievalPipeline, RetrievalResult,
};
use crate::core::router::Router;
use crate::core::types::{AiRequest, AiResponse, RequestPriority, Task};
use crate::utils::error::{GatewayError, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Upper bound on normalized request size
pub const MAX_REQUEST_TOKENS: u32 = 4000;
pub const DEFAULT_REQUEST_TOKENS: u32 = 1000;
pub const DEFAULT_REQUEST_TEMPERATURE: f32 = 0.7;
/// Size of the simplified retry after a failed request
pub const FALLBACK_REQUEST_TOKENS: u32 = 500;
/// k used when automatic k search is off
pub const DEFAULT_CLUSTER_K: usize = 3;
pub const MIN_CLUSTERING_POINTS: usize = 2;

const QUERY_OPERATION: &str = "rag";

/// Caching, request shaping and self-tuning on top of a [`Router`]
///
/// Configuration is read by cloning it at the start of each call, so no
/// lock is held while a provider or collaborator call is in flight.
pub struct OptimizationLayer {
    router: Arc<Router>,
    retrieval: Option<Arc<dyn RetrievalPipeline>>,
    clusterer: Option<Arc<dyn Clusterer>>,
    config: RwLock<OptimizationConfig>,
    cache: Arc<CacheManager<RetrievalResult>>,
    log: PerformanceLog,
    optimizer: AutoOptimizer,
}

impl OptimizationLayer {
    pub fn new(router: Arc<Router>, config: OptimizationConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(format!("Optimization config error: {}", e)))?;
        let cache = CacheManager::new(CacheConfig::from(&config.caching))?;

        Ok(Self {
            router,
            retrieval: None,
            clusterer: None,
            config: RwLock::new(config),
            cache: Arc::new(cache),
            log: PerformanceLog::new(),
            optimizer: AutoOptimizer,
        })
    }

    pub fn with_retrieval(mut self, retrieval: Arc<dyn RetrievalPipeline>) -> Self {
        self.retrieval = Some(retrieval);
        self
    }

    pub fn with_clusterer(mut self, clusterer: Arc<dyn Clusterer>) -> Self {
        self.clusterer = Some(clusterer);
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn cache(&self) -> &Arc<CacheManager<RetrievalResult>> {
        &self.cache
    }

    /// Route a request with normalized parameters and a simplified retry
    ///
    /// When the routed request fails and fallback is enabled, one smaller
    /// request (low priority, 500 tokens, no budget) is tried. If that fails
    /// too, the first error is returned.
    pub async fn optimized_ai_request(
        &self,
        prompt: &str,
        task: Task,
        options: AiRequestOptions,
    ) -> Result<OptimizedAiResponse> {
        let start = Instant::now();
        let routing = self.config.read().ai_routing.clone();
        let mut optimizations = Vec::new();

        let request = if routing.enabled {
            optimizations.push(Optimization::RequestOptimization);
            normalize_request(prompt, task, &options, &routing)
        } else {
            passthrough_request(prompt, task, &options)
        };

        let primary_error = match self.router.execute(request).await {
            Ok(response) => {
                self.record_ai_success(task, &response, start);
                return Ok(optimized_response(response, start, optimizations, false));
            }
            Err(err) => err,
        };

        if !routing.fallback_enabled {
            self.record_ai_failure(task, start);
            return Err(primary_error);
        }

        warn!(
            task = %task,
            error = %primary_error,
            "optimized request failed, retrying with simplified request"
        );
        optimizations.push(Optimization::FallbackAttempted);

        let fallback = AiRequest::new(prompt, task)
            .with_priority(RequestPriority::Low)
            .with_max_tokens(FALLBACK_REQUEST_TOKENS);

        match self.router.execute(fallback).await {
            Ok(response) => {
                self.record_ai_success(task, &response, start);
                Ok(optimized_response(response, start, optimizations, true))
            }
            Err(fallback_error) => {
                optimizations.push(Optimization::FallbackFailed);
                self.record_ai_failure(task, start);
                error!(
                    task = %task,
                    error = %fallback_error,
                    optimizations = ?optimizations,
                    "simplified retry failed"
                );
                Err(primary_error)
            }
        }
    }

    /// Answer a retrieval query, serving repeats from the cache
    pub async fn optimized_query(
        &self,
        query: &str,
        options: QueryOptions,
    ) -> Result<OptimizedQueryResponse> {
        let start = Instant::now();
        let config = self.config.read().clone();
        let mut optimizations = Vec::new();

        let key = query_cache_key(query, &options);
        let consult_cache = config.caching.enabled && options.use_cache && !options.force_refresh;

        let cached = if consult_cache { self.cache.get(&key) } else { None };
        if let Some(result) = cached {
            optimizations.push(Optimization::CacheHit);
            let processing_time = start.elapsed();
            self.log.record_query(QuerySample {
                processing_time,
                result_count: result.citations.len(),
                cache_hit: true,
            });
            return Ok(OptimizedQueryResponse {
                result,
                metadata: QueryMetadata {
                    cache_hit: true,
                    processing_time,
                    optimizations,
                },
            });
        }

        let retrieval = self.retrieval.as_ref().ok_or_else(|| {
            GatewayError::Config("No retrieval pipeline configured".to_string())
        })?;

        let params = if config.vector_search.enabled {
            optimizations.push(Optimization::ParameterOptimization);
            optimize_query_params(&options, &config.vector_search)
        } else {
            RetrievalOptions {
                threshold: options.threshold.unwrap_or(config.vector_search.default_threshold),
                limit: options.limit.unwrap_or(config.vector_search.max_results),
                include_context: true,
            }
        };

        debug!(threshold = params.threshold, limit = params.limit, "running retrieval");
        let result = retrieval.retrieve_and_generate(query, &params).await?;

        if config.caching.enabled {
            self.cache.set(key, result.clone(), None);
            optimizations.push(Optimization::ResultCached);
        }

        let processing_time = start.elapsed();
        self.log.record_query(QuerySample {
            processing_time,
            result_count: result.citations.len(),
            cache_hit: false,
        });

        Ok(OptimizedQueryResponse {
            result,
            metadata: QueryMetadata {
                cache_hit: false,
                processing_time,
                optimizations,
            },
        })
    }

    /// Cluster points, searching for a better k when quality is poor
    pub async fn optimized_clustering(
        &self,
        points: &[DataPoint],
        options: ClusteringOptions,
    ) -> Result<ClusteringReport> {
        let start = Instant::now();
        let config = self.config.read().clustering.clone();

        if points.len() < MIN_CLUSTERING_POINTS {
            return Err(GatewayError::insufficient_data(
                "clustering",
                MIN_CLUSTERING_POINTS,
                points.len(),
            ));
        }
        if !config.enabled {
            return Err(GatewayError::Config("Clustering is disabled".to_string()));
        }
        let clusterer = self
            .clusterer
            .as_ref()
            .ok_or_else(|| GatewayError::Config("No clusterer configured".to_string()))?;

        let max_clusters = options.max_clusters.unwrap_or(config.max_clusters);
        if !MAX_CLUSTERS_RANGE.contains(&max_clusters) {
            return Err(GatewayError::Config(format!(
                "Max clusters must be between {} and {}, got {}",
                MAX_CLUSTERS_RANGE.start(),
                MAX_CLUSTERS_RANGE.end(),
                max_clusters
            )));
        }

        let mut optimizations = Vec::new();
        // Half the points bounds k, but never below two clusters
        let max_k = max_clusters.min(points.len() / 2).max(MIN_CLUSTERING_POINTS);
        let quality_threshold = options.quality_threshold.unwrap_or(config.quality_threshold);

        let mut k = DEFAULT_CLUSTER_K.min(max_k);
        if config.auto_optimize_k {
            k = clusterer.find_optimal_k(points, max_k).await?;
            optimizations.push(Optimization::AutoKOptimization);
        }

        let mut best: ClusteringOutcome = clusterer.cluster(points, k).await?;
        let mut best_score = best.quality();

        if best_score < quality_threshold {
            optimizations.push(Optimization::QualityReoptimization);
            debug!(k, score = best_score, quality_threshold, "clustering below quality threshold");

            let initial_k = k;
            for candidate in MIN_CLUSTERING_POINTS..=max_k {
                if candidate == initial_k {
                    continue;
                }
                let outcome = clusterer.cluster(points, candidate).await?;
                if outcome.quality() > best_score {
                    best_score = outcome.quality();
                    best = outcome;
                    k = candidate;
                }
            }
        }

        let processing_time = start.elapsed();
        self.log.record_clustering(ClusteringSample {
            points: points.len(),
            optimal_k: k,
            silhouette_score: best_score,
            processing_time,
        });

        Ok(ClusteringReport {
            clusters: best.clusters,
            metrics: ClusteringMetrics {
                silhouette_score: best_score,
                optimal_k: k,
                processing_time,
            },
            optimizations,
        })
    }

    /// Aggregates over the recorded samples plus recommendations
    pub fn get_performance_analytics(&self) -> PerformanceAnalytics {
        let mut analytics = PerformanceAnalytics {
            rag_queries: self.log.query_analytics(),
            ai_requests: self.log.ai_request_analytics(),
            clustering: self.log.clustering_analytics(),
            recommendations: Vec::new(),
        };
        let config = self.config.read().clone();
        analytics.recommendations = self.optimizer.recommend(&analytics, &config);
        analytics
    }

    /// Tune the configuration from observed performance and report each change
    pub async fn auto_optimize(&self) -> Result<AutoOptimizeReport> {
        let analytics = self.get_performance_analytics();

        let (new_config, optimizations) = {
            let mut config = self.config.write();
            let (tuned, changes) = self.optimizer.tune(&analytics, &config);
            tuned
                .validate()
                .map_err(|e| GatewayError::Config(format!("Optimization config error: {}", e)))?;
            *config = tuned.clone();
            (tuned, changes)
        };

        for change in &optimizations {
            info!(
                component = %change.component,
                action = %change.action,
                "applied optimization"
            );
        }
        self.cache
            .set_default_ttl(Duration::from_secs(new_config.caching.ttl));

        Ok(AutoOptimizeReport {
            optimizations,
            new_config,
        })
    }

    pub fn get_config(&self) -> OptimizationConfig {
        self.config.read().clone()
    }

    /// Replace the configuration after validating it
    pub fn update_config(&self, new_config: OptimizationConfig) -> Result<()> {
        new_config
            .validate()
            .map_err(|e| GatewayError::Config(format!("Optimization config error: {}", e)))?;

        self.cache.resize(new_config.caching.max_size)?;
        self.cache
            .set_default_ttl(Duration::from_secs(new_config.caching.ttl));
        *self.config.write() = new_config;
        info!("Optimization configuration updated");
        Ok(())
    }

    /// Spawn the periodic cache sweep
    pub fn start_background_tasks(&self) -> JoinHandle<()> {
        let period = Duration::from_secs(self.config.read().caching.cleanup_interval_secs);
        info!(period_secs = period.as_secs(), "starting cache cleanup task");
        self.cache.start_cleanup_task(period)
    }

    fn record_ai_success(&self, task: Task, response: &AiResponse, start: Instant) {
        self.log.record_ai_request(AiRequestSample {
            task,
            provider: Some(response.provider.clone()),
            cost: response.cost,
            processing_time: start.elapsed(),
            success: true,
        });
    }

    fn record_ai_failure(&self, task: Task, start: Instant) {
        self.log.record_ai_request(AiRequestSample {
            task,
            provider: None,
            cost: 0.0,
            processing_time: start.elapsed(),
            success: false,
        });
    }
}

impl std::fmt::Debug for OptimizationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizationLayer")
            .field("config", &*self.config.read())
            .field("has_retrieval", &self.retrieval.is_some())
            .field("has_clusterer", &self.clusterer.is_some())
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}

/// Defaults and caps applied before routing
pub fn normalize_request(
    prompt: &str,
    task: Task,
    options: &AiRequestOptions,
    routing: &AiRoutingConfig,
) -> AiRequest {
    let max_tokens = options
        .max_tokens
        .filter(|tokens| *tokens > 0)
        .unwrap_or(DEFAULT_REQUEST_TOKENS)
        .min(MAX_REQUEST_TOKENS);

    AiRequest::new(prompt, task)
        .with_priority(options.priority.unwrap_or_default())
        .with_max_tokens(max_tokens)
        .with_temperature(options.temperature.unwrap_or(DEFAULT_REQUEST_TEMPERATURE))
        .with_budget(options.budget.unwrap_or(routing.cost_threshold))
}

fn passthrough_request(prompt: &str, task: Task, options: &AiRequestOptions) -> AiRequest {
    let mut request =
        AiRequest::new(prompt, task).with_priority(options.priority.unwrap_or_default());
    request.max_tokens = options.max_tokens;
    request.temperature = options.temperature;
    request.budget = options.budget;
    request
}

/// Threshold from the caller or config, limit capped at `max_results`
pub fn optimize_query_params(
    options: &QueryOptions,
    search: &VectorSearchConfig,
) -> RetrievalOptions {
    RetrievalOptions {
        threshold: options.threshold.unwrap_or(search.default_threshold),
        limit: options
            .limit
            .unwrap_or(search.max_results)
            .min(search.max_results),
        include_context: true,
    }
}

/// The cache flags do not change the answer, so they stay out of the key
fn query_cache_key(query: &str, options: &QueryOptions) -> CacheKey {
    let params = serde_json::json!({
        "threshold": options.threshold,
        "limit": options.limit,
    });
    CacheKey::derive(QUERY_OPERATION, query, &params)
}

fn optimized_response(
    response: AiResponse,
    start: Instant,
    optimizations: Vec<Optimization>,
    fallback_used: bool,
) -> OptimizedAiResponse {
    OptimizedAiResponse {
        content: response.content,
        provider: response.provider,
        model: response.model,
        cost: response.cost,
        metadata: AiRequestMetadata {
            processing_time: start.elapsed(),
            optimizations,
            fallback_used,
        },
    }
}
