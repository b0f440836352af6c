pub mod daily;
pub mod engine;
pub mod focus;
pub mod pomodoro;

pub use daily::{DailyStats, DayChangeDetector};
pub use engine::{SessionTimerEngine, TimerContext};
pub use focus::FocusSession;
pub use pomodoro::{PomodoroSession, PomodoroSettings};
