//! Configuration management for the router
//!
//! This module handles loading, validation, and management of router and
//! optimization configuration.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub optimization: OptimizationConfig,
    /// Provider overrides; providers not listed use their preset
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults plus overrides resolved through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings for one provider kind, if configured
    pub fn provider(
        &self,
        kind: crate::core::providers::ProviderKind,
    ) -> Option<&ProviderSettings> {
        self.providers.iter().find(|p| p.kind == kind)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.router
            .validate()
            .map_err(|e| GatewayError::Config(format!("Router config error: {}", e)))?;

        self.optimization
            .validate()
            .map_err(|e| GatewayError::Config(format!("Optimization config error: {}", e)))?;

        for provider in &self.providers {
            provider
                .validate()
                .map_err(|e| GatewayError::Config(format!("Provider config error: {}", e)))?;
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
