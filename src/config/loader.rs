//! Configuration loading utilities
//!
//! Environment overrides are read through a lookup closure so callers (and
//! tests) decide where values come from.

use super::Config;
use crate::utils::error::{GatewayError, Result};
use std::str::FromStr;
use tracing::debug;

pub const ENV_CALL_TIMEOUT_SECS: &str = "ROUTER_CALL_TIMEOUT_SECS";
pub const ENV_DEFAULT_TEMPERATURE: &str = "ROUTER_DEFAULT_TEMPERATURE";
pub const ENV_CACHE_TTL_SECS: &str = "CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_SIZE: &str = "CACHE_MAX_SIZE";
pub const ENV_AI_COST_THRESHOLD: &str = "AI_COST_THRESHOLD";

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => {
            let value = raw.trim().parse::<T>().map_err(|e| {
                GatewayError::Config(format!("Invalid value for {}: {} ({})", name, raw, e))
            })?;
            debug!(variable = name, "applied environment override");
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

impl Config {
    /// Apply the supported environment overrides on top of this configuration
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = parse_var(&lookup, ENV_CALL_TIMEOUT_SECS)? {
            self.router.call_timeout_secs = secs;
        }
        if let Some(temperature) = parse_var(&lookup, ENV_DEFAULT_TEMPERATURE)? {
            self.router.default_temperature = temperature;
        }
        if let Some(ttl) = parse_var(&lookup, ENV_CACHE_TTL_SECS)? {
            self.optimization.caching.ttl = ttl;
        }
        if let Some(max_size) = parse_var(&lookup, ENV_CACHE_MAX_SIZE)? {
            self.optimization.caching.max_size = max_size;
        }
        if let Some(threshold) = parse_var(&lookup, ENV_AI_COST_THRESHOLD)? {
            self.optimization.ai_routing.cost_threshold = threshold;
        }
        Ok(())
    }
}
