//! Configuration integration
//!
//! Builds the registry from credentials: a provider kind is registered only
//! when an API key is available for it, either in the configuration or in
//! its credential environment variable.

use super::registry::ProviderRegistry;
use super::router::Router;
use crate::config::{Config, ProviderSettings};
use crate::core::providers::ProviderKind;
use crate::core::providers::base_provider::build_http_client;
use crate::utils::error::{GatewayError, Result};
use reqwest::Client;
use tracing::debug;

impl ProviderRegistry {
    /// Register every provider kind that has a credential
    ///
    /// Kinds are registered in [`ProviderKind::ALL`] order. A kind without a
    /// credential is skipped, never an error.
    pub fn from_credentials<F>(lookup: F, overrides: &[ProviderSettings], http: Client) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let registry = Self::new();

        for kind in ProviderKind::ALL {
            let settings = overrides.iter().find(|s| s.kind == kind);

            let api_key = settings
                .and_then(|s| s.api_key.clone())
                .or_else(|| lookup(kind.credential_env()))
                .filter(|key| !key.trim().is_empty());

            let Some(api_key) = api_key else {
                debug!(
                    provider = %kind,
                    env = kind.credential_env(),
                    "no credential, skipping provider"
                );
                continue;
            };

            let config = match settings {
                Some(settings) => settings.apply_to(kind.preset()),
                None => kind.preset(),
            };
            let api_base = settings.and_then(|s| s.api_base.as_deref());
            let adapter = kind.build_adapter(&api_key, api_base, http.clone());

            registry.register_with_adapter(config, adapter);
        }

        registry
    }
}

impl Router {
    /// Create a Router from configuration, reading credentials from the environment
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Create a Router from configuration with an explicit credential lookup
    pub fn from_config_with<F>(config: &Config, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http = build_http_client(config.router.call_timeout())
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let registry = ProviderRegistry::from_credentials(lookup, &config.providers, http);
        Ok(Self::new(registry, config.router.clone()))
    }
}
