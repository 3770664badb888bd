/// Scheduling state for trigger-hour windows.
///
/// A trigger hour is any hour with `hour % run_frequency == 0`. The window
/// re-arms as soon as the clock leaves a trigger hour, or when it moves to a
/// different trigger hour (needed when every hour is a trigger hour).
#[derive(Debug, Clone)]
pub struct RunWindow {
    run_frequency: u32,
    last_triggered_hour: Option<u32>,
    has_run_this_window: bool,
}

impl RunWindow {
    pub fn new(run_frequency: u32) -> Self {
        Self {
            run_frequency: run_frequency.max(1),
            last_triggered_hour: None,
            has_run_this_window: false,
        }
    }

    pub fn is_trigger_hour(&self, hour: u32) -> bool {
        hour % self.run_frequency == 0
    }

    /// Decides whether a cycle should start now. Leaving a trigger hour
    /// disarms the "already ran" flag.
    pub fn should_run(&mut self, hour: u32) -> bool {
        if !self.is_trigger_hour(hour) {
            self.has_run_this_window = false;
            return false;
        }
        if self.has_run_this_window && self.last_triggered_hour != Some(hour) {
            self.has_run_this_window = false;
        }
        !self.has_run_this_window
    }

    /// Closes the window for `hour`, whatever the cycle's outcome.
    pub fn mark_ran(&mut self, hour: u32) {
        self.last_triggered_hour = Some(hour);
        self.has_run_this_window = true;
    }

    pub fn has_run_this_window(&self) -> bool {
        self.has_run_this_window
    }

    pub fn last_triggered_hour(&self) -> Option<u32> {
        self.last_triggered_hour
    }
}
