//! Progress notification port
//!
//! Defines the interface for reporting stage progress during a pipeline run.

use tabula_domain::Stage;

/// Callback for progress updates during a pipeline run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait PipelineProgress: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage);

    /// Called when a stage completes, with a short human-readable summary
    fn on_stage_complete(&self, stage: Stage, summary: &str);

    /// Called when a stage fails and the run is about to stop
    fn on_stage_failed(&self, _stage: Stage, _error: &str) {}

    /// Called once after the answer is ready
    fn on_finished(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PipelineProgress for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage, _summary: &str) {}
}
