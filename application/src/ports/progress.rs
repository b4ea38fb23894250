//! Progress notification port
//!
//! Defines the interface for reporting progress during a panel run.

use panel_domain::{SettledSlot, Stage};

/// Callback for progress updates during a panel run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.). Callbacks are
/// invoked from the joining task only, never from inside provider calls.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when a provider slot settles (success, failure or fallback)
    fn on_slot_settled(&self, slot: &SettledSlot);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_slot_settled(&self, _slot: &SettledSlot) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
