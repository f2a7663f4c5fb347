//! Execution helpers for router operations
//!
//! Free functions used by the execute methods in `execute_impl`.

use super::registry::ProviderConfig;
use super::selection::token_limit;
use crate::core::providers::CompletionRequest;
use crate::core::types::{AiRequest, RequestPriority};
use crate::utils::error::GatewayError;

/// Lifecycle of one routed request
///
/// `Success` and `Failed` reached from a fallback state are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Selecting,
    Executing,
    Success,
    Failed,
    FallbackSelecting,
    FallbackExecuting,
}

/// Whether a primary-attempt error is recovered through the fallback path
///
/// Only transport failures (timeouts included) are; a missing adapter or
/// an empty candidate set surface immediately.
pub fn triggers_fallback(error: &GatewayError) -> bool {
    matches!(error, GatewayError::ProviderTransport(_))
}

/// The request used for the fallback attempt
pub fn elevate_for_fallback(request: &AiRequest) -> AiRequest {
    AiRequest {
        priority: RequestPriority::High,
        ..request.clone()
    }
}

/// Build the adapter call for `provider`
pub fn build_completion_request(
    request: &AiRequest,
    provider: &ProviderConfig,
    default_temperature: f32,
) -> CompletionRequest {
    CompletionRequest {
        prompt: request.prompt.clone(),
        model: provider.model.clone(),
        max_tokens: token_limit(request, provider),
        temperature: request.temperature.unwrap_or(default_temperature),
    }
}

/// Cost of a completed call
pub fn call_cost(tokens_used: u64, provider: &ProviderConfig) -> f64 {
    tokens_used as f64 * provider.cost_per_token
}
