use crate::clock::whole_seconds_between;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Open-ended focus stopwatch.
///
/// `is_active` and `is_paused` are never both true. While active,
/// `start_time` marks the start of the current running stretch and
/// `paused_time` holds everything accumulated before it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSession {
    pub is_active: bool,
    pub is_paused: bool,
    pub start_time: Option<DateTime<Local>>,
    /// Displayed elapsed seconds
    pub current_time: u64,
    /// Seconds accumulated before the current running stretch
    pub paused_time: u64,
    /// Lifetime focus in hours
    pub total_focus_time: f64,
    pub sessions_today: u32,
    pub last_session_date: Option<NaiveDate>,
}

impl FocusSession {
    /// Neither running nor paused
    pub fn is_idle(&self) -> bool {
        !self.is_active && !self.is_paused
    }

    /// Seconds in the current running stretch
    pub fn stretch_secs(&self, now: DateTime<Local>) -> u64 {
        self.start_time
            .map(|start| whole_seconds_between(start, now))
            .unwrap_or(0)
    }

    /// Total session seconds at `now`
    pub fn total_secs(&self, now: DateTime<Local>) -> u64 {
        if self.is_active {
            self.paused_time + self.stretch_secs(now)
        } else {
            self.paused_time
        }
    }

    /// Refresh `current_time` from the clock
    pub fn recompute(&mut self, now: DateTime<Local>) {
        self.current_time = self.total_secs(now);
    }

    /// Reset the per-day counter when the session date is not `today`
    pub fn roll_day(&mut self, today: NaiveDate) -> bool {
        if self.last_session_date == Some(today) {
            return false;
        }
        self.sessions_today = 0;
        self.last_session_date = Some(today);
        true
    }

    /// Clear the running state, keeping the cumulative counters
    pub fn clear(&mut self) {
        self.is_active = false;
        self.is_paused = false;
        self.start_time = None;
        self.current_time = 0;
        self.paused_time = 0;
    }

    /// Normalize a session read back from storage.
    ///
    /// An active session keeps its stored `start_time`, so the time the
    /// program was not running is counted. A paused session shows its paused
    /// total. A contradictory or incomplete blob is reset.
    pub fn restored(mut self, now: DateTime<Local>) -> Self {
        if self.is_active && self.start_time.is_some() {
            self.is_paused = false;
            self.recompute(now);
        } else if self.is_paused {
            self.is_active = false;
            self.start_time = None;
            self.current_time = self.paused_time;
        } else {
            self.clear();
        }
        self
    }
}
