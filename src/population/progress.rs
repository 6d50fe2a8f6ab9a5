//! Progress reporting for long-running analyses.

/// Trait for collaborators receiving progress notifications from an analysis.
///
/// Notifications are delivered synchronously. `initialize` is called once before any `update`.
pub trait Progress {
    /// Announces the total number of steps.
    fn initialize(&mut self, total: usize);

    /// Announces that `current` steps have been completed.
    fn update(&mut self, current: usize, message: &str);
}

/// Progress reporter emitting debug-level log records.
#[derive(Clone, Debug, Default)]
pub struct LogProgress {
    total: usize,
}

impl LogProgress {
    /// Constructs a new logging progress reporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for LogProgress {
    fn initialize(&mut self, total: usize) {
        self.total = total;
        log::debug!("Progress initialised with {total} step(s).");
    }

    fn update(&mut self, current: usize, message: &str) {
        let width = self.total.to_string().len();
        log::debug!("[{current:>width$}/{}] {message}", self.total);
    }
}
