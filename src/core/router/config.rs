//! Router configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Router configuration
///
/// ## Defaults
///
/// - `call_timeout_secs`: 30
/// - `default_temperature`: 0.7
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Upper bound on a single provider call, in seconds
    pub call_timeout_secs: u64,

    /// Temperature used when the request does not set one
    pub default_temperature: f32,
}

impl RouterConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn with_call_timeout_secs(mut self, secs: u64) -> Self {
        self.call_timeout_secs = secs;
        self
    }

    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 30,
            default_temperature: 0.7,
        }
    }
}
