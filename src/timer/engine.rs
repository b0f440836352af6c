use super::daily::DailyStats;
use super::focus::FocusSession;
use super::pomodoro::{PhaseTransition, PomodoroSession, PomodoroSettings};
use crate::domain::TaskGraph;
use crate::notifications::{Notifier, NotifyOptions};
use crate::persistence::store::StoreError;
use crate::persistence::{keys, load_or_default, save_json, save_or_warn, KeyValueStore, Settings};
use crate::ticker::Interval;
use chrono::{DateTime, Local};
use tracing::{debug, info};
use uuid::Uuid;

/// Everything a timer operation may touch outside the engine
pub struct TimerContext<'a> {
    pub now: DateTime<Local>,
    pub graph: &'a mut TaskGraph,
    pub daily: &'a mut DailyStats,
    pub store: &'a dyn KeyValueStore,
    pub notifier: &'a dyn Notifier,
    /// Set when logged time changed the graph and it needs saving
    pub graph_changed: bool,
}

/// Focus stopwatch and Pomodoro countdown, mutually exclusive.
///
/// Both timers are driven by [`Interval`]s polled from the main loop. Every
/// fired tick re-checks the session flag before touching state, so a tick that
/// races a stop is dropped.
#[derive(Debug, Clone)]
pub struct SessionTimerEngine {
    focus: FocusSession,
    pomodoro: PomodoroSession,
    focus_interval: Interval,
    pomodoro_interval: Interval,
    focus_notify_after_secs: u64,
}

impl SessionTimerEngine {
    /// Idle engine with the given settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            focus: FocusSession::default(),
            pomodoro: PomodoroSession {
                settings: settings.pomodoro(),
                ..Default::default()
            },
            focus_interval: Interval::every_second(),
            pomodoro_interval: Interval::every_second(),
            focus_notify_after_secs: settings.focus_notify_after_secs,
        }
    }

    /// Load persisted sessions. A running focus session resumes ticking;
    /// a Pomodoro is never resumed.
    pub fn restore(store: &dyn KeyValueStore, settings: &Settings, now: DateTime<Local>) -> Self {
        let mut engine = Self::new(settings);
        let focus: FocusSession = load_or_default(store, keys::FOCUS_SESSION);
        let pomodoro: PomodoroSession = load_or_default(store, keys::POMODORO_SESSION);

        engine.focus = focus.restored(now);
        engine.pomodoro = pomodoro.restored(settings.pomodoro());

        if engine.focus.is_active {
            engine.focus_interval.start(now);
            info!(
                elapsed_secs = engine.focus.current_time,
                "restored running focus session"
            );
        } else if engine.focus.is_paused {
            info!(paused_secs = engine.focus.paused_time, "restored paused focus session");
        }
        engine
    }

    pub fn focus(&self) -> &FocusSession {
        &self.focus
    }

    pub fn pomodoro(&self) -> &PomodoroSession {
        &self.pomodoro
    }

    pub fn pomodoro_settings(&self) -> PomodoroSettings {
        self.pomodoro.settings
    }

    /// Active Pomodoro whose countdown is stopped
    pub fn pomodoro_paused(&self) -> bool {
        self.pomodoro.is_active && !self.pomodoro_interval.is_running()
    }

    /// Focus rollover for a new day
    pub fn roll_focus_day(&mut self, now: DateTime<Local>, store: &dyn KeyValueStore) {
        if self.focus.roll_day(now.date_naive()) {
            debug!(date = %now.date_naive(), "focus day rolled over");
            self.save_focus(store);
        }
    }

    // ---- focus ----

    /// Start (or continue a paused) focus session. Stops a live Pomodoro first.
    pub fn start_focus(&mut self, ctx: &mut TimerContext<'_>) -> bool {
        if self.focus.is_active {
            return false;
        }

        if self.pomodoro.is_active {
            self.stop_pomodoro(ctx);
        }

        self.roll_focus_day(ctx.now, ctx.store);

        self.focus.is_active = true;
        self.focus.is_paused = false;
        self.focus.start_time = Some(ctx.now);
        if self.focus.paused_time == 0 {
            self.focus.current_time = 0;
            self.focus.sessions_today += 1;
        }
        self.focus_interval.start(ctx.now);
        self.save_focus(ctx.store);

        info!(
            sessions_today = self.focus.sessions_today,
            carried_secs = self.focus.paused_time,
            "focus session started"
        );
        true
    }

    pub fn pause_focus(&mut self, now: DateTime<Local>, store: &dyn KeyValueStore) -> bool {
        if !self.focus.is_active {
            return false;
        }

        self.focus.paused_time += self.focus.stretch_secs(now);
        self.focus.is_active = false;
        self.focus.is_paused = true;
        self.focus.start_time = None;
        self.focus.current_time = self.focus.paused_time;
        self.focus_interval.cancel();
        self.save_focus(store);

        info!(paused_secs = self.focus.paused_time, "focus session paused");
        true
    }

    pub fn resume_focus(&mut self, now: DateTime<Local>, store: &dyn KeyValueStore) -> bool {
        if self.focus.is_active || !self.focus.is_paused {
            return false;
        }

        self.focus.is_active = true;
        self.focus.is_paused = false;
        self.focus.start_time = Some(now);
        self.focus_interval.start(now);
        self.save_focus(store);

        info!(paused_secs = self.focus.paused_time, "focus session resumed");
        true
    }

    /// Finish the session. Returns the session length in seconds, or None when idle.
    pub fn stop_focus(&mut self, ctx: &mut TimerContext<'_>) -> Option<u64> {
        if self.focus.is_idle() {
            return None;
        }

        let final_secs = self.focus.total_secs(ctx.now);
        let hours = final_secs as f64 / 3600.0;

        self.focus.total_focus_time += hours;
        ctx.daily.add_hours(hours);
        self.focus.clear();
        self.focus_interval.cancel();

        self.save_focus(ctx.store);
        save_or_warn(ctx.store, keys::DAILY_STATS, &*ctx.daily);

        info!(final_secs, "focus session stopped");

        if final_secs > self.focus_notify_after_secs {
            let minutes = (hours * 60.0).round() as u64;
            ctx.notifier.notify(
                "Focus Session Complete!",
                &format!("Great work! You focused for {} minutes.", minutes),
                &NotifyOptions::with_sound(),
            );
        }

        Some(final_secs)
    }

    // ---- pomodoro ----

    /// Begin a Pomodoro work phase linked to a task. Stops any focus session first.
    pub fn start_pomodoro(
        &mut self,
        ctx: &mut TimerContext<'_>,
        project_id: Option<Uuid>,
        task_id: Option<Uuid>,
    ) -> bool {
        if self.pomodoro.is_active {
            return false;
        }

        if !self.focus.is_idle() {
            self.stop_focus(ctx);
        }

        self.pomodoro.begin(project_id, task_id);
        self.pomodoro_interval.start(ctx.now);
        self.save_pomodoro(ctx.store);

        info!(
            round = self.pomodoro.current_round,
            task = ?task_id,
            "pomodoro work phase started"
        );
        true
    }

    /// Stop the countdown; the session stays active
    pub fn pause_pomodoro(&mut self, store: &dyn KeyValueStore) -> bool {
        if !self.pomodoro.is_active || !self.pomodoro_interval.is_running() {
            return false;
        }
        self.pomodoro_interval.cancel();
        self.save_pomodoro(store);
        info!(remaining_secs = self.pomodoro.time_remaining, "pomodoro paused");
        true
    }

    pub fn resume_pomodoro(&mut self, now: DateTime<Local>, store: &dyn KeyValueStore) -> bool {
        if !self.pomodoro.is_active || self.pomodoro_interval.is_running() {
            return false;
        }
        self.pomodoro_interval.start(now);
        self.save_pomodoro(store);
        info!(remaining_secs = self.pomodoro.time_remaining, "pomodoro resumed");
        true
    }

    /// End the session. Work done in an unfinished work phase is logged.
    pub fn stop_pomodoro(&mut self, ctx: &mut TimerContext<'_>) -> bool {
        if !self.pomodoro.is_active {
            return false;
        }

        let partial = self.pomodoro.partial_work_secs();
        if partial > 0 {
            self.log_work(ctx, partial);
        }

        self.pomodoro.end();
        self.pomodoro_interval.cancel();
        self.save_pomodoro(ctx.store);

        info!(partial_secs = partial, "pomodoro stopped");
        true
    }

    // ---- scheduling ----

    /// Apply every tick that became due. Returns true when something visible changed.
    pub fn poll(&mut self, ctx: &mut TimerContext<'_>) -> bool {
        let mut changed = false;

        let focus_due = self.focus_interval.due_ticks(ctx.now);
        if focus_due > 0 && self.focus.is_active {
            self.focus.recompute(ctx.now);
            self.save_focus(ctx.store);
            changed = true;
        }

        let pomodoro_due = self.pomodoro_interval.due_ticks(ctx.now);
        for _ in 0..pomodoro_due {
            if !self.pomodoro.is_active || !self.pomodoro_interval.is_running() {
                break;
            }
            if let Some(transition) = self.pomodoro.countdown() {
                self.finish_phase(ctx, transition);
            }
            changed = true;
        }
        if pomodoro_due > 0 && self.pomodoro.is_active {
            self.save_pomodoro(ctx.store);
        }

        changed
    }

    fn finish_phase(&mut self, ctx: &mut TimerContext<'_>, transition: PhaseTransition) {
        if let Some(secs) = transition.work_secs {
            self.log_work(ctx, secs);
        }

        info!(
            finished = ?transition.finished,
            next = ?transition.next,
            completed_rounds = self.pomodoro.completed_rounds,
            "pomodoro phase complete"
        );

        ctx.notifier.notify(
            "Pomodoro Timer",
            PomodoroSession::completion_message(transition.finished),
            &NotifyOptions::with_sound(),
        );
    }

    /// Log work seconds to the linked task and project. Missing links are skipped.
    fn log_work(&mut self, ctx: &mut TimerContext<'_>, secs: u64) {
        let Some((project_id, task_id)) = self.pomodoro.link() else {
            return;
        };
        let hours = secs as f64 / 3600.0;
        if ctx.graph.log_time(project_id, task_id, hours) {
            ctx.daily.add_hours(hours);
            ctx.graph_changed = true;
            save_or_warn(ctx.store, keys::DAILY_STATS, &*ctx.daily);
            debug!(%task_id, hours, "logged pomodoro time");
        } else {
            debug!(%task_id, "linked task missing, pomodoro time not logged");
        }
    }

    /// Write both sessions, reporting the first failure
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, keys::FOCUS_SESSION, &self.focus)?;
        save_json(store, keys::POMODORO_SESSION, &self.pomodoro)
    }

    fn save_focus(&self, store: &dyn KeyValueStore) {
        save_or_warn(store, keys::FOCUS_SESSION, &self.focus);
    }

    fn save_pomodoro(&self, store: &dyn KeyValueStore) {
        save_or_warn(store, keys::POMODORO_SESSION, &self.pomodoro);
    }
}
