//! Error handling
//!
//! The crate-level error taxonomy. Provider adapter failures live in
//! [`crate::core::providers::ProviderError`] and are wrapped here once they
//! reach the router.

pub mod types;

pub use types::*;
