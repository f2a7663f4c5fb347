//! Request telemetry
//!
//! One event per completed request, success or final failure. Sinks are
//! best-effort: a failing sink is logged and never fails the request.

use crate::core::types::{AiRequest, AiResponse, Task};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub task: Task,
    pub metadata: Map<String, Value>,
    pub success: bool,
    pub cost: f64,
    pub confidence: Option<f64>,
    pub quality: Option<f64>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub error_code: Option<&'static str>,
}

impl TelemetryEvent {
    /// Build the event describing the outcome of `request`
    pub fn for_outcome(
        request: &AiRequest,
        outcome: std::result::Result<&AiResponse, &GatewayError>,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("priority".into(), Value::String(request.priority.to_string()));
        if let Some(strategy) = &request.strategy {
            metadata.insert("strategy".into(), Value::String(strategy.clone()));
        }
        if let Some(context) = &request.context {
            metadata.insert("context".into(), context.clone());
        }

        let mut event = Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            task: request.task,
            metadata,
            success: false,
            cost: 0.0,
            confidence: None,
            quality: None,
            provider: None,
            model: None,
            error_code: None,
        };

        match outcome {
            Ok(response) => {
                event.success = true;
                event.cost = response.cost;
                event.confidence = response.confidence;
                event.quality = response.quality;
                event.provider = Some(response.provider.clone());
                event.model = Some(response.model.clone());
            }
            Err(err) => event.error_code = Some(err.code()),
        }
        event
    }
}

/// Destination for telemetry events
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn record(&self, event: TelemetryEvent) -> Result<()>;
}

/// Emits each event as a structured `info!` line on the `telemetry` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetrySink;

#[async_trait]
impl TelemetrySink for TracingTelemetrySink {
    async fn record(&self, event: TelemetryEvent) -> Result<()> {
        let payload = serde_json::to_string(&event)?;
        info!(
            target: "telemetry",
            id = %event.id,
            task = %event.task,
            success = event.success,
            cost = event.cost,
            provider = event.provider.as_deref().unwrap_or("-"),
            payload = %payload,
            "request completed"
        );
        Ok(())
    }
}

/// Keeps events in memory; useful for embedding applications and tests
#[derive(Debug, Default)]
pub struct MemoryTelemetrySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemoryTelemetrySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl TelemetrySink for MemoryTelemetrySink {
    async fn record(&self, event: TelemetryEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}
