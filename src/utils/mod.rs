//! Utility modules
//!
//! - **error**: Error taxonomy and `Result` alias
//! - **logging**: `tracing` subscriber setup

pub mod error;
pub mod logging;

pub use error::{GatewayError, Result};
pub use logging::{LogFormat, LogLevel, init_logging};
