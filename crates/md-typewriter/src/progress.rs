//! Progress signal to status string mapping.

use tracing::{debug, warn};

pub const INITIAL_STATUS: &str = "Initializing...";

/// What a progress update produced for the progress surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub status: String,

    /// True only for the update that first reached 100
    pub completed: bool,
}

/// Tracks the last progress signal and fires completion exactly once.
///
/// Percentages are expected in `[0, 100]` and normally non-decreasing.
/// Neither is enforced: values outside the range are a caller error and
/// produce an unspecified (but non-panicking) status.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    percent: f64,
    status: String,
    completed: bool,
    failed: bool,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            status: INITIAL_STATUS.to_string(),
            completed: false,
            failed: false,
        }
    }

    /// Record a progress signal.
    ///
    /// After [`ProgressTracker::fail`] the display is frozen and updates only
    /// echo the failure status.
    pub fn update(&mut self, percent: f64) -> ProgressUpdate {
        if self.failed {
            debug!("progress {percent} after failure ignored");
            return ProgressUpdate {
                status: self.status.clone(),
                completed: false,
            };
        }

        if percent < self.percent {
            warn!("progress went backwards: {} -> {percent}", self.percent);
        }
        self.percent = percent;
        self.status = format!("Generating... {}%", percent.round());

        let completed = !self.completed && percent >= 100.0;
        if completed {
            self.completed = true;
        }

        ProgressUpdate {
            status: self.status.clone(),
            completed,
        }
    }

    /// Enter a terminal failure state with a visible status message.
    pub fn fail(&mut self, reason: &str) -> &str {
        if !self.failed {
            self.failed = true;
            self.status = reason.to_string();
        }
        &self.status
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Whether the completion action may be revealed.
    pub fn is_ready(&self) -> bool {
        self.completed
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
