//! Unified provider error handling
//!
//! A single error type shared by every provider adapter. The router treats
//! all of these as transport failures of one specific call: they are
//! recorded against the provider and trigger the one-shot fallback.
//!
//! | Variant | Purpose | HTTP Status | Retryable |
//! |------|------|------------|--------|
//! | Authentication | Credential rejected | 401 | No |
//! | RateLimit | Rate limit exceeded | 429 | Yes |
//! | Timeout | Per-call timeout elapsed | 504 | Yes |
//! | Network | Connection or transport failure | 503 | Yes |
//! | ApiError | Any other non-2xx upstream status | upstream | 429/5xx only |
//! | ResponseParsing | Upstream body could not be decoded | 502 | No |
//! | Configuration | Adapter misconfigured | 400 | No |

/// Unified provider error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Request to {provider} timed out: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("API error from {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to parse response from {provider}: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider,
            message: match retry_after {
                Some(secs) => format!("retry after {}s", secs),
                None => "rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(provider: &'static str, status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::authentication(provider, body),
            429 => Self::rate_limit(provider, None),
            _ => Self::api_error(provider, status, body),
        }
    }

    /// Map a reqwest failure for a named provider
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(provider, err.to_string())
        } else if err.is_decode() {
            Self::response_parsing(provider, err.to_string())
        } else {
            Self::network(provider, err.to_string())
        }
    }

    /// Get the provider name that caused this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Network { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::Configuration { provider, .. } => provider,
        }
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Authentication { .. } => 401,
            Self::RateLimit { .. } => 429,
            Self::Timeout { .. } => 504,
            Self::Network { .. } => 503,
            Self::ApiError { status, .. } => *status,
            Self::ResponseParsing { .. } => 502,
            Self::Configuration { .. } => 400,
        }
    }
}
