//! Common test utilities for adaptive-router
//!
//! - Scripted in-process provider adapters
//! - Provider and router fixtures
//! - Float and error-code assertions

pub mod fixtures;
pub mod providers;

pub use fixtures::{ProviderFactory, router_with};
pub use providers::{Script, ScriptedAdapter};
