use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::time::Duration;

/// Default terminal poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Period of the focus and Pomodoro timers
pub const TIMER_PERIOD_SECS: i64 = 1;

/// Get the terminal poll duration used by the main loop
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// A cancellable repeating schedule driven by the main loop.
///
/// The interval does not own a thread. The loop calls [`Interval::due_ticks`]
/// on every poll and the owner applies that many ticks, so time that elapsed
/// while the loop was blocked is caught up instead of dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: ChronoDuration,
    next_due: Option<DateTime<Local>>,
}

impl Interval {
    /// Create a stopped interval with the given period
    pub fn every(period: ChronoDuration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Create a stopped one-second interval
    pub fn every_second() -> Self {
        Self::every(ChronoDuration::seconds(TIMER_PERIOD_SECS))
    }

    /// Start (or restart) the schedule; the first tick is due one period from `now`
    pub fn start(&mut self, now: DateTime<Local>) {
        self.next_due = Some(now + self.period);
    }

    /// Stop the schedule. Cancelling a stopped interval does nothing.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that became due up to `now`, advancing the schedule past them
    pub fn due_ticks(&mut self, now: DateTime<Local>) -> u32 {
        let Some(mut next) = self.next_due else {
            return 0;
        };

        let mut count = 0;
        while next <= now {
            count += 1;
            next += self.period;
        }
        self.next_due = Some(next);
        count
    }
}
