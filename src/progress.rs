//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing queries
///
/// To avoid corrupted terminal output, you should not write anything to
/// stderr yourself as long as a report is being displayed. Please use logs
/// for debug messages.
#[derive(Clone, Debug)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the terminal
    pub fn new() -> Self {
        Self(MultiProgress::new())
    }

    /// Report that is never displayed
    pub fn hidden() -> Self {
        Self(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    /// Prepare to report on a new operation that sends some HTTP requests
    pub fn add_requests(
        &self,
        what: impl Into<Cow<'static, str>>,
        requests: usize,
    ) -> ProgressTracker {
        let bar = ProgressBar::new(requests as u64)
            .with_prefix(what.into())
            .with_style(
                ProgressStyle::with_template("{prefix} {wide_bar} {pos}/{len} ({elapsed})")
                    .expect("the style above should be a valid indicatif style"),
            );
        ProgressTracker {
            bar: self.0.add(bar),
            report: self.0.clone(),
        }
    }
}
//
impl Default for ProgressReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Mechanism to track the progress of one operation
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific operation
    bar: ProgressBar,

    /// Underlying report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    ///
    /// Returns truth that the progress bar has reached its maximum value, in
    /// which case it is removed from the report.
    pub fn make_progress(&self, progress: u64) -> bool {
        self.bar.inc(progress);
        let current = self.bar.position();
        let max = self.bar.length().unwrap_or(0);
        debug_assert!(current <= max, "recorded more progress than expected");
        let finished = current >= max;
        if finished {
            self.finish();
        }
        finished
    }

    /// Hide the progress bar, whether all work was done or not
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
