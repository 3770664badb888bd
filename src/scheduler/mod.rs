pub mod run_window;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, Timelike};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::error::Result;

pub use run_window::RunWindow;

/// How a scrape-and-report cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed {
        report: PathBuf,
        categories: usize,
        records: usize,
    },
    /// The category list was not there; nothing was scraped.
    SourceUnavailable,
}

/// One full scrape-and-report pass.
pub trait RunCycle {
    async fn run_cycle(&mut self) -> Result<CycleOutcome>;
}

/// Wakes every `poll_interval` and runs at most one cycle per trigger-hour
/// window. The only writer of its [`RunWindow`].
pub struct Scheduler<C> {
    cycle: C,
    window: RunWindow,
    poll_interval: Duration,
}

impl<C: RunCycle> Scheduler<C> {
    pub fn new(cycle: C, run_frequency_hours: u32, poll_interval: Duration) -> Self {
        Self {
            cycle,
            window: RunWindow::new(run_frequency_hours),
            poll_interval,
        }
    }

    pub async fn run(mut self) {
        let mut ticker = interval(self.poll_interval);
        // A cycle can outlast many ticks; don't burst to catch up afterwards.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick(Local::now().hour()).await;
        }
    }

    /// Runs the cycle if `hour` opens a new window. Returns whether it ran.
    ///
    /// The window is closed after any outcome, including errors, so a failing
    /// cycle is retried in the next window rather than on every tick.
    pub async fn tick(&mut self, hour: u32) -> bool {
        if !self.window.should_run(hour) {
            return false;
        }

        info!(
            hour,
            previous = ?self.window.last_triggered_hour(),
            "[SCHEDULER] Starting to fetch at {}",
            Local::now(),
        );
        match self.cycle.run_cycle().await {
            Ok(CycleOutcome::Completed { report, categories, records }) => {
                info!(
                    categories,
                    records,
                    "[SCHEDULER] Report saved to {}",
                    report.display(),
                );
            }
            Ok(CycleOutcome::SourceUnavailable) => {
                warn!(hour, "[SCHEDULER] category list unavailable, skipping this window");
            }
            Err(e) => {
                error!(hour, "[SCHEDULER] cycle failed: {e}");
            }
        }

        self.window.mark_ran(hour);
        true
    }
}
