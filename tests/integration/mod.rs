//! Integration tests for adaptive-router
//!
//! These tests drive the public API with in-process adapters or a local
//! mock HTTP server; nothing here needs real credentials.

pub mod optimization_tests;
pub mod provider_tests;
pub mod router_tests;
