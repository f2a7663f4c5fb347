//! Bounded log of recent optimization-layer calls

use super::types::{AiRequestAnalytics, ClusteringAnalytics, QueryAnalytics};
use crate::core::types::Task;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Samples kept per kind; older ones are dropped first
pub const SAMPLE_WINDOW: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySample {
    pub processing_time: Duration,
    pub result_count: usize,
    pub cache_hit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiRequestSample {
    pub task: Task,
    /// Provider that served the request; `None` when it failed
    pub provider: Option<String>,
    pub cost: f64,
    pub processing_time: Duration,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringSample {
    pub points: usize,
    pub optimal_k: usize,
    pub silhouette_score: f64,
    pub processing_time: Duration,
}

#[derive(Debug, Default)]
struct Samples {
    queries: VecDeque<QuerySample>,
    ai_requests: VecDeque<AiRequestSample>,
    clustering: VecDeque<ClusteringSample>,
}

fn push_bounded<T>(samples: &mut VecDeque<T>, sample: T) {
    if samples.len() == SAMPLE_WINDOW {
        samples.pop_front();
    }
    samples.push_back(sample);
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Performance samples, one window per kind
#[derive(Debug, Default)]
pub struct PerformanceLog {
    samples: Mutex<Samples>,
}

impl PerformanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_query(&self, sample: QuerySample) {
        push_bounded(&mut self.samples.lock().queries, sample);
    }

    pub fn record_ai_request(&self, sample: AiRequestSample) {
        push_bounded(&mut self.samples.lock().ai_requests, sample);
    }

    pub fn record_clustering(&self, sample: ClusteringSample) {
        push_bounded(&mut self.samples.lock().clustering, sample);
    }

    pub fn query_analytics(&self) -> QueryAnalytics {
        let samples = self.samples.lock();
        let queries = &samples.queries;
        let total_time: f64 = queries.iter().map(|s| millis(s.processing_time)).sum();
        let hits = queries.iter().filter(|s| s.cache_hit).count();

        QueryAnalytics {
            avg_response_time_ms: mean(total_time, queries.len()),
            cache_hit_rate: mean(hits as f64, queries.len()),
            total_queries: queries.len(),
        }
    }

    pub fn ai_request_analytics(&self) -> AiRequestAnalytics {
        let samples = self.samples.lock();
        let requests = &samples.ai_requests;
        let total_time: f64 = requests.iter().map(|s| millis(s.processing_time)).sum();
        let total_cost: f64 = requests.iter().map(|s| s.cost).sum();
        let successes = requests.iter().filter(|s| s.success).count();

        let mut provider_distribution = BTreeMap::new();
        for provider in requests.iter().filter_map(|s| s.provider.as_ref()) {
            *provider_distribution.entry(provider.clone()).or_insert(0) += 1;
        }

        AiRequestAnalytics {
            avg_response_time_ms: mean(total_time, requests.len()),
            success_rate: mean(successes as f64, requests.len()),
            cost_per_request: mean(total_cost, requests.len()),
            provider_distribution,
            total_requests: requests.len(),
        }
    }

    pub fn clustering_analytics(&self) -> ClusteringAnalytics {
        let samples = self.samples.lock();
        let runs = &samples.clustering;
        let total_time: f64 = runs.iter().map(|s| millis(s.processing_time)).sum();
        let total_score: f64 = runs.iter().map(|s| s.silhouette_score).sum();

        ClusteringAnalytics {
            avg_processing_time_ms: mean(total_time, runs.len()),
            avg_silhouette_score: mean(total_score, runs.len()),
            total_clusters: runs.iter().map(|s| s.optimal_k).sum(),
            total_runs: runs.len(),
        }
    }

    pub fn clear(&self) {
        *self.samples.lock() = Samples::default();
    }
}
