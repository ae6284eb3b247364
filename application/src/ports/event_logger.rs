//! Port for structured pipeline event logging.
//!
//! Defines the [`PipelineEventLogger`] trait for recording pipeline events
//! (stage results, classifications, tool applications, prompts) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures one
//! machine-readable record per event (JSONL).

use serde_json::Value;

/// A structured pipeline event for logging.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. The adapter adds the timestamp.
#[derive(Debug, Clone)]
pub struct PipelineEvent {
    /// Event type identifier (e.g., "stage_completed", "classification").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl PipelineEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging pipeline events to a structured log.
///
/// `log` is synchronous and non-fallible; implementations drop events they
/// cannot write.
pub trait PipelineEventLogger: Send + Sync {
    fn log(&self, event: PipelineEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEventLogger;

impl PipelineEventLogger for NoEventLogger {
    fn log(&self, _event: PipelineEvent) {}
}
