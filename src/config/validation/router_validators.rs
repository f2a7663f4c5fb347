//! Router and provider configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for RouterConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating router configuration");

        if self.call_timeout_secs == 0 {
            return Err("Router call timeout must be greater than 0".to_string());
        }

        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err("Router default temperature must be between 0 and 2".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderSettings {
    fn validate(&self) -> Result<(), String> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(format!("Provider {} model cannot be empty", self.kind));
            }
        }

        if self.max_tokens == Some(0) {
            return Err(format!(
                "Provider {} max tokens must be greater than 0",
                self.kind
            ));
        }

        if let Some(cost) = self.cost_per_token {
            if !cost.is_finite() || cost < 0.0 {
                return Err(format!(
                    "Provider {} cost per token must be a non-negative number",
                    self.kind
                ));
            }
        }

        if let Some(capabilities) = self.capabilities {
            if capabilities.is_empty() {
                return Err(format!(
                    "Provider {} must declare at least one capability",
                    self.kind
                ));
            }
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
                return Err(format!(
                    "Provider {} api_base must be an http(s) URL",
                    self.kind
                ));
            }
        }

        Ok(())
    }
}
