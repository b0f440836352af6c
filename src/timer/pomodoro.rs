use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of a Pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work Time",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Self::Work)
    }
}

/// Phase lengths in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroSettings {
    pub work_duration: u64,
    pub short_break_duration: u64,
    pub long_break_duration: u64,
    pub rounds_before_long_break: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25 * 60,
            short_break_duration: 5 * 60,
            long_break_duration: 15 * 60,
            rounds_before_long_break: 4,
        }
    }
}

impl PomodoroSettings {
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break_duration,
            Phase::LongBreak => self.long_break_duration,
        }
    }
}

/// Result of finishing a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub finished: Phase,
    pub next: Phase,
    /// Work seconds to log when a work phase finished
    pub work_secs: Option<u64>,
}

/// Structured countdown alternating work and breaks.
///
/// The linked task and project are weak references: they are looked up by id
/// when time is logged and may no longer exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroSession {
    pub is_active: bool,
    pub current_phase: Phase,
    pub time_remaining: u64,
    pub current_round: u32,
    pub linked_task_id: Option<Uuid>,
    pub linked_project_id: Option<Uuid>,
    pub settings: PomodoroSettings,
    pub completed_rounds: u32,
    /// Completed work seconds
    pub total_work_time: u64,
}

impl PomodoroSession {
    /// Enter a fresh work phase linked to a task
    pub fn begin(&mut self, project_id: Option<Uuid>, task_id: Option<Uuid>) {
        self.is_active = true;
        self.linked_project_id = project_id;
        self.linked_task_id = task_id;
        self.current_phase = Phase::Work;
        self.current_round += 1;
        self.time_remaining = self.settings.work_duration;
    }

    /// Count down one second. Returns the transition when the phase ran out.
    pub fn countdown(&mut self) -> Option<PhaseTransition> {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            Some(self.complete_phase())
        } else {
            None
        }
    }

    /// Advance to the next phase, updating the round counters
    pub fn complete_phase(&mut self) -> PhaseTransition {
        let finished = self.current_phase;
        let mut work_secs = None;

        let next = if finished == Phase::Work {
            work_secs = Some(self.settings.work_duration);
            self.completed_rounds += 1;
            self.total_work_time += self.settings.work_duration;

            let every = self.settings.rounds_before_long_break.max(1);
            if self.completed_rounds % every == 0 {
                Phase::LongBreak
            } else {
                Phase::ShortBreak
            }
        } else {
            self.current_round += 1;
            Phase::Work
        };

        self.current_phase = next;
        self.time_remaining = self.settings.duration_of(next);

        PhaseTransition {
            finished,
            next,
            work_secs,
        }
    }

    /// Work seconds done so far in the current work phase (0 during breaks)
    pub fn partial_work_secs(&self) -> u64 {
        if self.current_phase == Phase::Work {
            self.settings
                .work_duration
                .saturating_sub(self.time_remaining)
        } else {
            0
        }
    }

    /// Deactivate and drop the links, keeping the counters
    pub fn end(&mut self) {
        self.is_active = false;
        self.linked_task_id = None;
        self.linked_project_id = None;
    }

    /// Linked ids when both are set
    pub fn link(&self) -> Option<(Uuid, Uuid)> {
        Some((self.linked_project_id?, self.linked_task_id?))
    }

    /// Notification body announcing the end of `finished`
    pub fn completion_message(finished: Phase) -> &'static str {
        if finished == Phase::Work {
            "Work session completed! Time for a break."
        } else {
            "Break time over! Ready for the next work session?"
        }
    }

    /// Normalize a session read from storage: never resumed active
    pub fn restored(mut self, settings: PomodoroSettings) -> Self {
        self.end();
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn short_settings() -> PomodoroSettings {
        PomodoroSettings {
            work_duration: 3,
            short_break_duration: 2,
            long_break_duration: 4,
            rounds_before_long_break: 2,
        }
    }

    fn run_phase(session: &mut PomodoroSession) -> PhaseTransition {
        loop {
            if let Some(t) = session.countdown() {
                return t;
            }
        }
    }

    #[test]
    fn test_begin_starts_work_round() {
        let mut session = PomodoroSession::default();
        session.begin(None, None);
        assert!(session.is_active);
        assert_eq!(session.current_phase, Phase::Work);
        assert_eq!(session.time_remaining, 25 * 60);
        assert_eq!(session.current_round, 1);
    }

    #[test]
    fn test_cycle_reaches_long_break() {
        let mut session = PomodoroSession {
            settings: short_settings(),
            ..Default::default()
        };
        session.begin(None, None);

        let first = run_phase(&mut session);
        assert_eq!(first.next, Phase::ShortBreak);
        assert_eq!(first.work_secs, Some(3));
        assert_eq!(session.time_remaining, 2);

        let brk = run_phase(&mut session);
        assert_eq!(brk.finished, Phase::ShortBreak);
        assert_eq!(brk.work_secs, None);
        assert_eq!(session.current_round, 2);

        let second = run_phase(&mut session);
        assert_eq!(second.next, Phase::LongBreak);
        assert_eq!(session.time_remaining, 4);
        assert_eq!(session.completed_rounds, 2);
        assert_eq!(session.total_work_time, 6);
    }

    #[test]
    fn test_partial_work_secs() {
        let mut session = PomodoroSession::default();
        session.begin(None, None);
        for _ in 0..90 {
            session.countdown();
        }
        assert_eq!(session.partial_work_secs(), 90);

        session.current_phase = Phase::ShortBreak;
        assert_eq!(session.partial_work_secs(), 0);
    }

    #[test]
    fn test_restored_never_active() {
        let mut session = PomodoroSession::default();
        session.begin(Some(Uuid::new_v4()), Some(Uuid::new_v4()));
        session.completed_rounds = 3;

        let restored = session.restored(short_settings());
        assert!(!restored.is_active);
        assert_eq!(restored.link(), None);
        assert_eq!(restored.completed_rounds, 3);
        assert_eq!(restored.settings, short_settings());
    }
}
