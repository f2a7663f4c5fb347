//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `router_validators`: Router and provider validators
//! - `optimization_validators`: Cache, routing, retrieval and clustering validators
//! - `tests`: Test suite for all validators

mod optimization_validators;
mod router_validators;
mod trait_def;

pub use trait_def::Validate;
