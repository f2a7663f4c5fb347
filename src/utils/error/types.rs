//! Error types for the router and optimization layer

use crate::core::providers::ProviderError;
use crate::core::types::Task;
use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No active provider supports the requested task
    #[error("No available AI providers for task: {task}")]
    ProviderUnavailable { task: Task },

    /// The selected provider has no execution path (no adapter registered)
    #[error("Unsupported AI provider: {provider}")]
    ProviderUnsupported { provider: String },

    /// A specific provider call failed
    #[error("Provider call failed: {0}")]
    ProviderTransport(#[from] ProviderError),

    /// The one-shot fallback failed or no alternative existed
    #[error(
        "No fallback AI providers available (attempted: {}): primary failure: {primary}{}",
        .attempted.join(", "),
        .fallback.as_ref().map(|e| format!("; fallback failure: {}", e)).unwrap_or_default()
    )]
    ProviderFallbackUnavailable {
        attempted: Vec<String>,
        primary: Box<GatewayError>,
        fallback: Option<Box<GatewayError>>,
    },

    /// Optimization or clustering requested with too few data points
    #[error("Insufficient data for {operation}: need at least {required}, got {actual}")]
    InsufficientData {
        operation: String,
        required: usize,
        actual: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Retrieval pipeline or clustering collaborator errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Telemetry sink errors (never surfaced from request paths)
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn insufficient_data(operation: impl Into<String>, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            operation: operation.into(),
            required,
            actual,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable { .. } => "AI_PROVIDER_UNAVAILABLE",
            Self::ProviderUnsupported { .. } => "AI_PROVIDER_UNSUPPORTED",
            Self::ProviderTransport(_) => "AI_PROVIDER_TRANSPORT_ERROR",
            Self::ProviderFallbackUnavailable { .. } => "AI_PROVIDER_FALLBACK_UNAVAILABLE",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Retrieval(_) => "RETRIEVAL_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// HTTP-equivalent status for translation at an API boundary
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ProviderUnavailable { .. } => 503,
            Self::ProviderUnsupported { .. } => 400,
            Self::ProviderTransport(err) => err.http_status(),
            Self::ProviderFallbackUnavailable { .. } => 503,
            Self::InsufficientData { .. } => 400,
            Self::Retrieval(_) => 502,
            Self::Config(_)
            | Self::Telemetry(_)
            | Self::Io(_)
            | Self::Yaml(_)
            | Self::Serialization(_) => 500,
        }
    }

    /// Providers that were tried before this error was raised
    pub fn attempted_providers(&self) -> Vec<String> {
        match self {
            Self::ProviderFallbackUnavailable { attempted, .. } => attempted.clone(),
            Self::ProviderUnsupported { provider } => vec![provider.clone()],
            Self::ProviderTransport(err) => vec![err.provider().to_string()],
            _ => Vec::new(),
        }
    }
}
