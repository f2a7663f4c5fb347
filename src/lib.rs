//! # adaptive-router
//!
//! Routes generic "generate text" requests across interchangeable LLM
//! providers. Each request is scored against every capable provider on
//! priority, cost, observed reliability and latency, executed with one
//! transparent fallback, and recorded so later decisions learn from it.
//! An optimization layer adds a response cache, request shaping and
//! self-tuning configuration on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adaptive_router::{AiRequest, Config, Router, Task};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Providers with a credential in the environment are registered
//!     let router = Router::from_config(&Config::from_env()?)?;
//!
//!     let response = router
//!         .execute(
//!             AiRequest::new("Name three prime numbers", Task::TextGeneration).with_budget(0.05),
//!         )
//!         .await?;
//!     println!("{} answered: {}", response.provider, response.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Optimization layer
//!
//! ```rust,no_run
//! use adaptive_router::{AiRequestOptions, Config, OptimizationLayer, Router, Task};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/router.yaml").await?;
//!     let router = Arc::new(Router::from_config(&config)?);
//!     let layer = OptimizationLayer::new(router, config.optimization.clone())?;
//!     let _sweep = layer.start_background_tasks();
//!
//!     let response = layer
//!         .optimized_ai_request(
//!             "Summarize the release notes",
//!             Task::Summarization,
//!             AiRequestOptions::default(),
//!         )
//!         .await?;
//!     println!("{:?}", response.metadata.optimizations);
//!
//!     let report = layer.auto_optimize().await?;
//!     println!("{} changes applied", report.optimizations.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use core::cache_manager::{CacheConfig, CacheKey, CacheManager, CacheStats};
pub use core::optimizer::{
    AiRequestOptions, AutoOptimizeReport, ClusteringOptions, OptimizationLayer,
    OptimizedAiResponse, OptimizedQueryResponse, PerformanceAnalytics, QueryOptions,
};
pub use core::providers::{
    AnthropicAdapter, GoogleAdapter, MistralAdapter, OpenAIAdapter, ProviderAdapter,
    ProviderError, ProviderKind,
};
pub use core::retrieval::{Clusterer, DataPoint, RetrievalPipeline, RetrievalResult};
pub use core::router::{ProviderConfig, ProviderRegistry, Router, RouterConfig};
pub use core::telemetry::{TelemetryEvent, TelemetrySink, TracingTelemetrySink};
pub use core::types::{AiRequest, AiResponse, RequestPriority, Task, TaskSet};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
