//! Retrieval and clustering collaborators
//!
//! The optimization layer drives these through traits; the vector search,
//! answer generation and k-means internals live behind them.

use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source document backing part of an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub title: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Similarity to the query, in `0.0..=1.0`
    pub relevance_score: f64,
}

/// Parameters handed to the retrieval pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalOptions {
    /// Minimum similarity of returned documents
    pub threshold: f64,
    pub limit: usize,
    pub include_context: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub answer: String,
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub context: Vec<String>,
}

/// Retrieve relevant documents and generate an answer grounded in them
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RetrievalPipeline: Send + Sync {
    async fn retrieve_and_generate(
        &self,
        query: &str,
        options: &RetrievalOptions,
    ) -> Result<RetrievalResult>;
}

/// One embedded item to cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: String,
    pub vector: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl DataPoint {
    pub fn new(id: impl Into<String>, vector: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub centroid: Vec<f64>,
    /// Ids of the member points
    pub members: Vec<String>,
    pub inertia: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    pub clusters: Vec<Cluster>,
    /// Silhouette score in `-1.0..=1.0`; `None` when it could not be computed
    pub silhouette_score: Option<f64>,
}

impl ClusteringOutcome {
    /// Silhouette score, with a missing score counted as 0
    pub fn quality(&self) -> f64 {
        self.silhouette_score.unwrap_or(0.0)
    }
}

/// k-means style clustering
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Clusterer: Send + Sync {
    /// Best k in `2..=max_k` by the clusterer's own criterion
    async fn find_optimal_k(&self, points: &[DataPoint], max_k: usize) -> Result<usize>;

    async fn cluster(&self, points: &[DataPoint], k: usize) -> Result<ClusteringOutcome>;
}
