//! Core routing and optimization engine
//!
//! Requests enter through [`router::Router`] or the caching
//! [`optimizer::OptimizationLayer`] wrapped around it.

pub mod cache_manager;
pub mod optimizer;
pub mod providers;
pub mod retrieval;
pub mod router;
pub mod telemetry;
pub mod types;
