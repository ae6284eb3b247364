//! Progress reporting for pipeline execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tabula_application::PipelineProgress;
use tabula_domain::Stage;

/// Reports stage progress on one spinner line
pub struct StageProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl StageProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stage_display_name(stage: Stage) -> String {
        format!("[{}/{}] {}", stage.number(), Stage::ALL.len(), stage)
    }
}

impl Default for StageProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineProgress for StageProgressReporter {
    fn on_stage_start(&self, stage: Stage) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        let bar = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        bar.set_prefix(Self::stage_display_name(stage));
        bar.set_message("running...");
    }

    fn on_stage_complete(&self, stage: Stage, summary: &str) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.println(format!("{} {} {}", "v".green(), stage, summary.dimmed()));
        }
    }

    fn on_stage_failed(&self, stage: Stage, error: &str) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.println(format!("{} {} {}", "x".red(), stage, error));
        }
    }

    fn on_finished(&self) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl PipelineProgress for SimpleProgress {
    fn on_stage_start(&self, stage: Stage) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            StageProgressReporter::stage_display_name(stage).bold()
        );
    }

    fn on_stage_complete(&self, _stage: Stage, summary: &str) {
        eprintln!("  {} {}", "v".green(), summary);
    }

    fn on_stage_failed(&self, _stage: Stage, error: &str) {
        eprintln!("  {} {}", "x".red(), error);
    }
}
