//! Execution implementation for Router
//!
//! This module contains the execute, attempt and fallback methods.

use super::execution::{
    ExecutionState, build_completion_request, call_cost, elevate_for_fallback, triggers_fallback,
};
use super::metrics::AttemptOutcome;
use super::registry::ProviderConfig;
use super::router::Router;
use crate::core::providers::ProviderError;
use crate::core::telemetry::TelemetryEvent;
use crate::core::types::{AiRequest, AiResponse};
use crate::utils::error::{GatewayError, Result};
use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

impl Router {
    /// Execute a request with selection and a single fallback
    ///
    /// A transport failure of the primary provider is recovered by one
    /// attempt on the best remaining provider. Any other error surfaces
    /// immediately.
    pub async fn execute(&self, request: AiRequest) -> Result<AiResponse> {
        let result = self.execute_with_fallback(&request).await;
        self.finish(&request, result).await
    }

    async fn execute_with_fallback(&self, request: &AiRequest) -> Result<AiResponse> {
        debug!(task = %request.task, state = ?ExecutionState::Selecting, "routing request");
        let primary = self.select_provider(request, &[])?.config;

        debug!(provider = %primary.id, state = ?ExecutionState::Executing, "executing request");
        let primary_error = match self.attempt(&primary, request).await {
            Ok(response) => return Ok(response),
            Err(err) if triggers_fallback(&err) => err,
            Err(err) => return Err(err),
        };

        warn!(
            provider = %primary.id,
            error = %primary_error,
            state = ?ExecutionState::Failed,
            "primary provider failed, attempting fallback"
        );

        self.execute_fallback(request, &primary.id, primary_error)
            .await
    }

    async fn execute_fallback(
        &self,
        request: &AiRequest,
        failed_id: &str,
        primary_error: GatewayError,
    ) -> Result<AiResponse> {
        let request = elevate_for_fallback(request);

        debug!(
            excluded = %failed_id,
            state = ?ExecutionState::FallbackSelecting,
            "selecting fallback"
        );
        let alternative = match self.select_provider(&request, &[failed_id]) {
            Ok(scored) => scored.config,
            Err(_) => {
                error!(provider = %failed_id, "no fallback provider available");
                return Err(GatewayError::ProviderFallbackUnavailable {
                    attempted: vec![failed_id.to_string()],
                    primary: Box::new(primary_error),
                    fallback: None,
                });
            }
        };

        debug!(
            provider = %alternative.id,
            state = ?ExecutionState::FallbackExecuting,
            "executing fallback"
        );
        match self.attempt(&alternative, &request).await {
            Ok(response) => {
                info!(
                    primary = %failed_id,
                    fallback = %alternative.id,
                    state = ?ExecutionState::Success,
                    "fallback provider succeeded"
                );
                Ok(response)
            }
            Err(fallback_error) => {
                error!(
                    primary = %failed_id,
                    fallback = %alternative.id,
                    error = %fallback_error,
                    "fallback provider failed"
                );
                Err(GatewayError::ProviderFallbackUnavailable {
                    attempted: vec![failed_id.to_string(), alternative.id],
                    primary: Box::new(primary_error),
                    fallback: Some(Box::new(fallback_error)),
                })
            }
        }
    }

    /// One call against one provider, recorded in the performance tracker
    ///
    /// No lock is held while the call is in flight.
    pub(crate) async fn attempt(
        &self,
        provider: &ProviderConfig,
        request: &AiRequest,
    ) -> Result<AiResponse> {
        let adapter =
            self.registry
                .adapter(&provider.id)
                .ok_or_else(|| GatewayError::ProviderUnsupported {
                    provider: provider.id.clone(),
                })?;

        let call = build_completion_request(request, provider, self.config.default_temperature);
        let timeout = self.config.call_timeout();

        let start = Instant::now();
        let result = match tokio::time::timeout(timeout, adapter.generate_completion(call)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(
                adapter.name(),
                format!("no response within {}s", timeout.as_secs()),
            )),
        };
        let latency = start.elapsed();

        match result {
            Ok(completion) => {
                let tokens_used = completion.usage.total_tokens;
                let cost = call_cost(tokens_used, provider);
                self.tracker
                    .record(&provider.id, AttemptOutcome::success(latency, cost));
                self.add_cost(&provider.id, cost);

                debug!(
                    provider = %provider.id,
                    tokens_used,
                    cost,
                    latency_ms = latency.as_millis() as u64,
                    "provider call succeeded"
                );

                Ok(AiResponse {
                    content: completion.text,
                    provider: provider.id.clone(),
                    model: completion.model,
                    tokens_used,
                    cost,
                    latency,
                    timestamp: Utc::now(),
                    confidence: None,
                    quality: None,
                    telemetry_id: None,
                })
            }
            Err(err) => {
                self.tracker
                    .record(&provider.id, AttemptOutcome::failure(latency));
                Err(GatewayError::ProviderTransport(err))
            }
        }
    }

    /// Report the final outcome to the telemetry sink, if enabled
    async fn finish(
        &self,
        request: &AiRequest,
        mut result: Result<AiResponse>,
    ) -> Result<AiResponse> {
        let Some(sink) = self.telemetry.as_ref().filter(|_| request.telemetry_enabled) else {
            return result;
        };

        let event = TelemetryEvent::for_outcome(request, result.as_ref());
        let event_id = event.id;
        match sink.record(event).await {
            Ok(()) => {
                if let Ok(response) = result.as_mut() {
                    response.telemetry_id = Some(event_id);
                }
            }
            Err(err) => warn!(error = %err, "failed to record telemetry"),
        }
        result
    }
}
