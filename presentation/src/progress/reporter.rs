//! Progress reporting for panel runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use panel_application::ports::progress::ProgressNotifier;
use panel_domain::{SettledSlot, Stage};
use std::sync::Mutex;

/// Reports progress during a panel run with progress bars on stderr
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// One-line status for a settled slot
    fn slot_status(slot: &SettledSlot) -> String {
        let mut status = match slot.result.failure_kind() {
            None => format!("{} {}", "v".green(), slot.provider),
            Some(kind) => format!("{} {} ({})", "x".red(), slot.provider, kind),
        };
        match (slot.served_by(), &slot.fallback) {
            (Some(fallback), _) => status.push_str(&format!(" via {}", fallback)),
            (None, Some(fallback)) => {
                status.push_str(&format!(" (fallback {} failed)", fallback))
            }
            (None, None) => {}
        }
        if slot.attempts > 1 {
            status.push_str(&format!(" after {} attempts", slot.attempts));
        }
        status
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(stage.display_name().to_string());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_slot_settled(&self, slot: &SettledSlot) {
        if let Ok(bar) = self.stage_bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(Self::slot_status(slot));
                pb.inc(1);
            }
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        let taken = self.stage_bar.lock().ok().and_then(|mut bar| bar.take());
        if let Some(pb) = taken {
            if let Some(len) = pb.length() {
                pb.set_position(len);
            }
            pb.finish_with_message(format!("{} done", stage.as_str().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so stdout stays clean for JSON output.
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            stage.display_name().bold(),
            total_tasks
        );
    }

    fn on_slot_settled(&self, slot: &SettledSlot) {
        eprintln!("  {}", ProgressReporter::slot_status(slot));
    }

    fn on_stage_complete(&self, _stage: Stage) {
        eprintln!();
    }
}
