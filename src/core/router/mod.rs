//! Core router for AI provider selection and request execution
//!
//! ## Module Structure
//!
//! - `config` - Router configuration
//! - `registry` - Provider registry and static provider attributes
//! - `selection` - Scoring and provider selection
//! - `metrics` - Per-provider performance tracking
//! - `router` - Core Router struct, status and cost tracking
//! - `execution` - Execution helpers
//! - `execute_impl` - Execute methods with single fallback
//! - `convenience` - Task-specific helpers
//! - `gateway_config` - Registration from configuration and credentials

pub mod config;
pub mod convenience;
pub mod execute_impl;
pub mod execution;
pub mod gateway_config;
pub mod metrics;
pub mod registry;
pub mod router;
pub mod selection;


pub use config::RouterConfig;
pub use execution::ExecutionState;
pub use metrics::{AttemptOutcome, PerformanceRecord, PerformanceTracker, ProviderStatus};
pub use registry::{ProviderConfig, ProviderRegistry};
pub use router::Router;
pub use selection::{ScoredProvider, estimate_cost, score};
