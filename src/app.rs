use crate::clock::Clock;
use crate::domain::{
    flatten_archive, flatten_board, flatten_goals, flatten_planned, flatten_projects, format_clock,
    BoardStatus, FlatRow, GoalDraft, Priority, ProjectDraft, RowTarget, TaskDraft, TaskGraph, TaskLink,
    UiMode, View,
};
use crate::history::{EditMetadata, UndoRedoSystem};
use crate::notifications::Notifier;
use crate::persistence::{keys, load_or_default, save_json, save_or_warn, KeyValueStore, Settings};
use crate::planner::{generate_task_suggestions, DailyPlanning, Suggestion};
use crate::report::stats::{AnalyticsData, DayProductivity};
use crate::timer::{DailyStats, DayChangeDetector, SessionTimerEngine, TimerContext};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

/// Seconds a toast stays visible
const TOAST_SECS: i64 = 2;

/// Delay before a project's completed tasks are archived
const AUTO_ARCHIVE_SECS: i64 = 1;

/// Short-lived status message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub expires_at: DateTime<Local>,
}

/// What an input form creates or edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    NewProject,
    EditProject(Uuid),
    NewTask(Uuid),
    EditTask { project_id: Uuid, task_id: Uuid },
    NewSubtask { project_id: Uuid, task_id: Uuid },
    EditSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    MoveTask { project_id: Uuid, task_id: Uuid },
    MoveSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    NewGoal,
    EditGoal(Uuid),
    LinkToGoal { project_id: Uuid, task_id: Uuid },
}

const PROJECT_FIELDS: &[&str] = &[
    "Name",
    "Description",
    "Aspect",
    "Priority (low/medium/high)",
    "Board (execution/incubation)",
    "Due (YYYY-MM-DD)",
    "Estimate (hours)",
    "Parent project",
];
const TASK_FIELDS: &[&str] = &[
    "Description",
    "Due (YYYY-MM-DD)",
    "Priority (blank = project's)",
    "Estimate (hours)",
];
const GOAL_FIELDS: &[&str] = &["Title", "Description", "Due (YYYY-MM-DD)"];

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::NewProject => "New Project",
            Self::EditProject(_) => "Edit Project",
            Self::NewTask(_) => "New Task",
            Self::EditTask { .. } => "Edit Task",
            Self::NewSubtask { .. } => "New Subtask",
            Self::EditSubtask { .. } => "Edit Subtask",
            Self::MoveTask { .. } => "Move Task",
            Self::MoveSubtask { .. } => "Move Subtask",
            Self::NewGoal => "New Goal",
            Self::EditGoal(_) => "Edit Goal",
            Self::LinkToGoal { .. } => "Link Task to Goal",
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::NewProject | Self::EditProject(_) => PROJECT_FIELDS,
            Self::NewTask(_) | Self::EditTask { .. } => TASK_FIELDS,
            Self::NewSubtask { .. } | Self::EditSubtask { .. } => &["Description"],
            Self::MoveTask { .. } => &["Target project"],
            Self::MoveSubtask { .. } => &["Target task"],
            Self::NewGoal | Self::EditGoal(_) => GOAL_FIELDS,
            Self::LinkToGoal { .. } => &["Goal title"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

/// Input form state for creating and editing
#[derive(Debug, Clone, PartialEq)]
pub struct InputFormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub editing_field: usize,
    /// Validation message from the last submit
    pub error: Option<String>,
}

impl InputFormState {
    fn new(kind: FormKind, values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let fields = kind
            .labels()
            .iter()
            .map(|label| FormField {
                label,
                value: values.next().unwrap_or_default(),
            })
            .collect();
        Self {
            kind,
            fields,
            editing_field: 0,
            error: None,
        }
    }

    /// Cycle to the next field
    pub fn toggle_field(&mut self) {
        self.editing_field = (self.editing_field + 1) % self.fields.len().max(1);
    }

    pub fn add_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.editing_field) {
            field.value.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.editing_field) {
            field.value.pop();
        }
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.trim()).unwrap_or("")
    }
}

/// Planner modal state
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerState {
    pub suggestions: Vec<Suggestion>,
    pub selected: Vec<bool>,
    pub cursor: usize,
}

impl PlannerState {
    fn new(suggestions: Vec<Suggestion>) -> Self {
        let selected = vec![false; suggestions.len()];
        Self {
            suggestions,
            selected,
            cursor: 0,
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.suggestions.len() {
            self.cursor += 1;
        }
    }

    pub fn toggle_current(&mut self) {
        if let Some(flag) = self.selected.get_mut(self.cursor) {
            *flag = !*flag;
        }
    }

    pub fn chosen_links(&self) -> Vec<TaskLink> {
        self.suggestions
            .iter()
            .zip(&self.selected)
            .filter(|(_, chosen)| **chosen)
            .map(|(s, _)| s.link())
            .collect()
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", value))?;
    Ok(Some(date))
}

fn parse_hours(value: &str) -> Result<f64> {
    if value.is_empty() {
        return Ok(0.0);
    }
    let hours: f64 = value
        .parse()
        .with_context(|| format!("Invalid estimate '{}'", value))?;
    if !hours.is_finite() || hours < 0.0 {
        bail!("Estimate must be zero or more hours");
    }
    Ok(hours)
}

fn parse_priority(value: &str) -> Result<Option<Priority>> {
    if value.is_empty() {
        return Ok(None);
    }
    match Priority::from_label(value) {
        Some(priority) => Ok(Some(priority)),
        None => bail!("Unknown priority '{}'", value),
    }
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn hours_text(hours: f64) -> String {
    if hours > 0.0 {
        hours.to_string()
    } else {
        String::new()
    }
}

/// Main application state
pub struct AppState {
    pub graph: TaskGraph,
    pub timers: SessionTimerEngine,
    pub history: UndoRedoSystem,
    pub daily: DailyStats,
    pub planning: DailyPlanning,
    pub analytics: AnalyticsData,
    detector: DayChangeDetector,
    store: Box<dyn KeyValueStore>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,

    pub view: View,
    /// Column shown in the board view
    pub board_column: BoardStatus,
    pub ui_mode: UiMode,
    pub selected_index: usize,
    pub input_form: Option<InputFormState>,
    pub planner: Option<PlannerState>,
    pub pending_delete: Option<RowTarget>,
    pub toast: Option<Toast>,
    pub needs_save: bool,
    /// Re-render signal consumed by the main loop
    pub needs_render: bool,
    /// Projects whose completed tasks get archived at the given time
    pending_archives: Vec<(Uuid, DateTime<Local>)>,
}

impl AppState {
    /// Load every persisted document and record the initial history entry
    pub fn new(
        store: Box<dyn KeyValueStore>,
        notifier: Box<dyn Notifier>,
        clock: Box<dyn Clock>,
        settings: Settings,
    ) -> Self {
        let now = clock.now();
        let graph: TaskGraph = load_or_default(store.as_ref(), keys::GRAPH);
        let timers = SessionTimerEngine::restore(store.as_ref(), &settings, now);

        let mut history = UndoRedoSystem::new(settings.history_cap());
        history.record_snapshot(&graph, "Initial state", EditMetadata::Initialization, now);

        let mut app = Self {
            daily: load_or_default(store.as_ref(), keys::DAILY_STATS),
            planning: load_or_default(store.as_ref(), keys::DAILY_PLANNING),
            analytics: load_or_default(store.as_ref(), keys::ANALYTICS),
            detector: load_or_default(store.as_ref(), keys::DAY_CHANGE_DETECTOR),
            graph,
            timers,
            history,
            store,
            notifier,
            clock,
            view: View::default(),
            board_column: BoardStatus::default(),
            ui_mode: UiMode::Normal,
            selected_index: 0,
            input_form: None,
            planner: None,
            pending_delete: None,
            toast: None,
            needs_save: false,
            needs_render: true,
            pending_archives: Vec::new(),
        };

        app.check_for_day_change();
        info!(
            projects = app.graph.projects.len(),
            goals = app.graph.goals.len(),
            streak = app.daily.streak_days,
            "state loaded"
        );
        app
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ---- day bookkeeping ----

    /// Handle a new calendar day. Returns true when the date moved since the last check.
    pub fn check_for_day_change(&mut self) -> bool {
        let now = self.clock.now();
        let today = now.date_naive();
        if self.detector.last_checked_date == Some(today) {
            return false;
        }

        let changed = self.detector.observe(today);
        save_or_warn(self.store.as_ref(), keys::DAY_CHANGE_DETECTOR, &self.detector);
        if changed {
            info!(%today, "day changed");
        }
        self.begin_day(now);
        changed
    }

    fn begin_day(&mut self, now: DateTime<Local>) {
        let today = now.date_naive();
        self.timers.roll_focus_day(now, self.store.as_ref());

        self.daily.refresh(today, self.graph.tasks_completed_on(today));
        save_or_warn(self.store.as_ref(), keys::DAILY_STATS, &self.daily);

        if self.planning.reset_for(today) {
            self.graph.clear_planned_flags();
            save_or_warn(self.store.as_ref(), keys::DAILY_PLANNING, &self.planning);
            self.needs_save = true;
        }

        self.update_analytics();
        self.needs_render = true;
    }

    /// Recount today's completions after a task changed
    fn refresh_daily_stats(&mut self) {
        let today = self.clock.today();
        self.daily.refresh(today, self.graph.tasks_completed_on(today));
        save_or_warn(self.store.as_ref(), keys::DAILY_STATS, &self.daily);
        self.update_analytics();
    }

    /// Upsert today's productivity counters
    pub fn update_analytics(&mut self) {
        let now = self.clock.now();
        let focus = self.timers.focus();
        let focus_sessions = if focus.last_session_date == Some(now.date_naive()) {
            focus.sessions_today
        } else {
            0
        };

        self.analytics.record_day(
            now,
            DayProductivity {
                time_logged: self.daily.total_time_today,
                tasks_completed: self.daily.completed_today,
                focus_sessions,
                pomodoro_sessions: self.timers.pomodoro().completed_rounds,
            },
        );
        save_or_warn(self.store.as_ref(), keys::ANALYTICS, &self.analytics);
    }

    // ---- main loop ----

    /// Advance timers and scheduled work to the current time. Returns true on a new day.
    pub fn tick(&mut self) -> bool {
        let day_changed = self.check_for_day_change();

        let changed = self.with_timers(|timers, ctx| timers.poll(ctx));
        if changed {
            self.needs_render = true;
        }

        let now = self.clock.now();
        self.run_due_archives(now);

        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            self.needs_render = true;
        }
        day_changed
    }

    /// Run a timer operation with a context borrowed from this state
    fn with_timers<R>(
        &mut self,
        f: impl FnOnce(&mut SessionTimerEngine, &mut TimerContext<'_>) -> R,
    ) -> R {
        let mut ctx = TimerContext {
            now: self.clock.now(),
            graph: &mut self.graph,
            daily: &mut self.daily,
            store: self.store.as_ref(),
            notifier: self.notifier.as_ref(),
            graph_changed: false,
        };
        let result = f(&mut self.timers, &mut ctx);
        let graph_changed = ctx.graph_changed;

        if graph_changed {
            self.needs_save = true;
            self.needs_render = true;
            self.update_analytics();
        }
        result
    }

    fn schedule_archive(&mut self, project_id: Uuid, now: DateTime<Local>) {
        let due = now + Duration::seconds(AUTO_ARCHIVE_SECS);
        match self.pending_archives.iter_mut().find(|(id, _)| *id == project_id) {
            Some(entry) => entry.1 = due,
            None => self.pending_archives.push((project_id, due)),
        }
    }

    /// Archive completed tasks for projects whose delay ran out. Not recorded in history.
    fn run_due_archives(&mut self, now: DateTime<Local>) {
        if self.pending_archives.is_empty() {
            return;
        }
        let (due, pending): (Vec<_>, Vec<_>) = self
            .pending_archives
            .drain(..)
            .partition(|(_, at)| *at <= now);
        self.pending_archives = pending;

        for (project_id, _) in due {
            let moved = self.graph.archive_completed_tasks(project_id, now);
            if moved > 0 {
                debug!(%project_id, moved, "auto-archived completed tasks");
                self.needs_save = true;
                self.needs_render = true;
            }
        }
        self.clamp_selection();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: self.clock.now() + Duration::seconds(TOAST_SECS),
        });
        self.needs_render = true;
    }

    // ---- selection ----

    /// Rows of the current view
    pub fn visible_rows(&self) -> Vec<FlatRow> {
        match self.view {
            View::Projects => flatten_projects(&self.graph),
            View::Board => flatten_board(&self.graph, self.board_column),
            View::Focus => flatten_planned(&self.graph),
            View::Goals => flatten_goals(&self.graph),
            View::Archive => flatten_archive(&self.graph),
        }
    }

    pub fn selected_target(&self) -> Option<RowTarget> {
        self.visible_rows()
            .get(self.selected_index)
            .map(|row| row.target)
    }

    /// Task of the selected task or subtask row
    fn selected_task(&self) -> Option<(Uuid, Uuid)> {
        let target = self.selected_target()?;
        Some((target.project_id()?, target.task_id()?))
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.needs_render = true;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_rows().len() {
            self.selected_index += 1;
            self.needs_render = true;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    pub fn cycle_view(&mut self) {
        self.view = self.view.next();
        self.selected_index = 0;
        self.needs_render = true;
    }

    /// Switch between the execution and incubation columns
    pub fn switch_board_column(&mut self) {
        if self.view == View::Board {
            self.board_column = self.board_column.toggled();
            self.selected_index = 0;
            self.needs_render = true;
        }
    }

    // ---- history ----

    fn record(&mut self, label: String, data: EditMetadata) {
        if self.history.is_performing_undo_redo() {
            debug!(action = %label, "edit during replay not recorded");
            return;
        }
        let now = self.clock.now();
        self.history.record_snapshot(&self.graph, label, data, now);
        self.needs_save = true;
        self.needs_render = true;
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            self.show_toast("Nothing to undo");
            return false;
        }
        match self.history.undo(&mut self.graph) {
            Some(message) => {
                self.after_replay();
                self.show_toast(message);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            self.show_toast("Nothing to redo");
            return false;
        }
        match self.history.redo(&mut self.graph) {
            Some(message) => {
                self.after_replay();
                self.show_toast(message);
                true
            }
            None => false,
        }
    }

    /// Re-derive state that lives outside the snapshots
    fn after_replay(&mut self) {
        self.pending_archives.clear();

        // Today's plan is not part of history
        self.graph.clear_planned_flags();
        if self.planning.last_planning_date == Some(self.clock.today()) {
            let links: Vec<TaskLink> = self
                .planning
                .planned_tasks
                .iter()
                .map(|p| TaskLink {
                    project_id: p.project_id,
                    task_id: p.task_id,
                })
                .collect();
            self.graph.mark_planned(&links);
        }

        self.refresh_daily_stats();
        self.clamp_selection();
        self.needs_save = true;
        self.needs_render = true;
    }

    // ---- projects ----

    pub fn create_project(&mut self, draft: ProjectDraft) -> Uuid {
        let name = draft.name.clone();
        let project_id = self.graph.create_project(draft, self.clock.now());
        self.record(
            format!("Created project: {}", name),
            EditMetadata::CreateProject { project_id },
        );
        project_id
    }

    pub fn update_project(&mut self, project_id: Uuid, draft: ProjectDraft) -> bool {
        let name = draft.name.clone();
        let Some(old) = self.graph.update_project(project_id, draft, self.clock.now()) else {
            return false;
        };
        self.record(
            format!("Updated project: {}", name),
            EditMetadata::UpdateProject {
                project_id,
                old: Box::new(old),
            },
        );
        true
    }

    pub fn delete_project(&mut self, project_id: Uuid) -> bool {
        let Some(deleted) = self.graph.delete_project(project_id) else {
            return false;
        };
        self.record(
            format!("Deleted project: {}", deleted.name),
            EditMetadata::DeleteProject {
                project_id,
                deleted: Box::new(deleted),
            },
        );
        self.refresh_daily_stats();
        self.clamp_selection();
        true
    }

    /// Move a project up or down among its siblings, keeping it selected
    pub fn reorder_project(&mut self, project_id: Uuid, offset: isize) -> bool {
        if !self.graph.reorder_project(project_id, offset, self.clock.now()) {
            return false;
        }
        let name = self.graph.project_name(project_id).unwrap_or_default().to_string();
        self.record(
            format!("Reordered project: {}", name),
            EditMetadata::ReorderProject { project_id },
        );
        self.select_target(RowTarget::Project { project_id });
        true
    }

    /// Flip a project between boards. Moving into incubation is tracked for analytics.
    pub fn move_project_board(&mut self, project_id: Uuid) -> bool {
        let now = self.clock.now();
        let Some(status) = self.graph.move_project_board(project_id, now) else {
            return false;
        };
        if status == BoardStatus::Incubation {
            self.analytics.track_incubation(now);
            save_or_warn(self.store.as_ref(), keys::ANALYTICS, &self.analytics);
        }
        let name = self.graph.project_name(project_id).unwrap_or_default().to_string();
        self.record(
            format!("Moved project to {}: {}", status.label(), name),
            EditMetadata::MoveProject { project_id },
        );
        self.clamp_selection();
        true
    }

    pub fn archive_project(&mut self, project_id: Uuid) -> bool {
        let name = self.graph.project_name(project_id).unwrap_or_default().to_string();
        if !self.graph.archive_project(project_id, self.clock.now()) {
            return false;
        }
        self.pending_archives.retain(|(id, _)| *id != project_id);
        self.record(
            format!("Archived project: {}", name),
            EditMetadata::ArchiveProject { project_id },
        );
        self.clamp_selection();
        true
    }

    pub fn restore_project(&mut self, project_id: Uuid) -> bool {
        if !self.graph.restore_project(project_id, self.clock.now()) {
            return false;
        }
        let name = self.graph.project_name(project_id).unwrap_or_default().to_string();
        self.record(
            format!("Restored project: {}", name),
            EditMetadata::RestoreProject { project_id },
        );
        self.clamp_selection();
        true
    }

    // ---- tasks ----

    fn task_description(&self, project_id: Uuid, task_id: Uuid) -> String {
        self.graph
            .task(project_id, task_id)
            .map(|t| t.description.clone())
            .unwrap_or_default()
    }

    pub fn add_task(&mut self, project_id: Uuid, draft: TaskDraft) -> Option<Uuid> {
        let description = draft.description.clone();
        let task_id = self.graph.add_task(project_id, draft, self.clock.now())?;
        self.record(
            format!("Created task: {}", description),
            EditMetadata::CreateTask {
                project_id,
                task_id,
            },
        );
        Some(task_id)
    }

    pub fn update_task(&mut self, project_id: Uuid, task_id: Uuid, draft: TaskDraft) -> bool {
        let description = draft.description.clone();
        let Some(old) = self
            .graph
            .update_task(project_id, task_id, draft, self.clock.now())
        else {
            return false;
        };
        self.record(
            format!("Updated task: {}", description),
            EditMetadata::UpdateTask {
                project_id,
                task_id,
                old: Box::new(old),
            },
        );
        true
    }

    /// Toggle completion. Completing schedules the project's auto-archive.
    pub fn toggle_task(&mut self, project_id: Uuid, task_id: Uuid) -> bool {
        let now = self.clock.now();
        let Some(was_completed) = self.graph.toggle_task(project_id, task_id, now) else {
            return false;
        };
        let verb = if was_completed {
            "Uncompleted task"
        } else {
            "Completed task"
        };
        let description = self.task_description(project_id, task_id);
        self.record(
            format!("{}: {}", verb, description),
            EditMetadata::ToggleTask {
                project_id,
                task_id,
                was_completed,
            },
        );

        self.refresh_daily_stats();
        if !was_completed {
            self.schedule_archive(project_id, now);
            if let Some(project) = self.graph.project(project_id).filter(|p| p.is_fully_completed()) {
                let message = format!("All tasks done in {}", project.name);
                self.show_toast(message);
            }
        }
        true
    }

    pub fn delete_task(&mut self, project_id: Uuid, task_id: Uuid) -> bool {
        let Some(deleted) = self.graph.delete_task(project_id, task_id, self.clock.now()) else {
            return false;
        };
        self.record(
            format!("Deleted task: {}", deleted.description),
            EditMetadata::DeleteTask {
                project_id,
                task_id,
                deleted: Box::new(deleted),
            },
        );
        self.refresh_daily_stats();
        self.clamp_selection();
        true
    }

    /// Move a task up or down within its project, keeping it selected
    pub fn reorder_task(&mut self, project_id: Uuid, task_id: Uuid, offset: isize) -> bool {
        if !self
            .graph
            .reorder_task(project_id, task_id, offset, self.clock.now())
        {
            return false;
        }
        let description = self.task_description(project_id, task_id);
        self.record(
            format!("Reordered task: {}", description),
            EditMetadata::ReorderTask {
                project_id,
                task_id,
            },
        );
        self.select_task(project_id, task_id);
        true
    }

    fn select_task(&mut self, project_id: Uuid, task_id: Uuid) {
        self.select_target(RowTarget::Task {
            project_id,
            task_id,
        });
    }

    fn select_target(&mut self, wanted: RowTarget) {
        if let Some(row) = self.visible_rows().iter().find(|r| r.target == wanted) {
            self.selected_index = row.index;
        }
    }

    pub fn move_task(&mut self, from_project: Uuid, task_id: Uuid, to_project: Uuid) -> bool {
        if !self
            .graph
            .move_task_to_project(from_project, task_id, to_project, self.clock.now())
        {
            return false;
        }
        let description = self.task_description(to_project, task_id);
        self.record(
            format!("Moved task: {}", description),
            EditMetadata::MoveTask {
                from_project,
                to_project,
                task_id,
            },
        );
        self.clamp_selection();
        true
    }

    pub fn restore_task(&mut self, project_id: Uuid, task_id: Uuid) -> bool {
        if !self.graph.restore_task(project_id, task_id, self.clock.now()) {
            return false;
        }
        let description = self.task_description(project_id, task_id);
        self.record(
            format!("Restored task: {}", description),
            EditMetadata::RestoreTask {
                project_id,
                task_id,
            },
        );
        self.refresh_daily_stats();
        self.clamp_selection();
        true
    }

    // ---- subtasks ----

    pub fn add_subtask(&mut self, project_id: Uuid, task_id: Uuid, description: String) -> Option<Uuid> {
        let label = format!("Created subtask: {}", description);
        let subtask_id = self
            .graph
            .add_subtask(project_id, task_id, description, self.clock.now())?;
        self.record(
            label,
            EditMetadata::CreateSubtask {
                project_id,
                task_id,
                subtask_id,
            },
        );
        Some(subtask_id)
    }

    pub fn toggle_subtask(&mut self, project_id: Uuid, task_id: Uuid, subtask_id: Uuid) -> bool {
        let Some(was_completed) =
            self.graph
                .toggle_subtask(project_id, task_id, subtask_id, self.clock.now())
        else {
            return false;
        };
        let verb = if was_completed {
            "Uncompleted subtask"
        } else {
            "Completed subtask"
        };
        let description = self
            .graph
            .task(project_id, task_id)
            .and_then(|t| t.subtasks.iter().find(|s| s.id == subtask_id))
            .map(|s| s.description.clone())
            .unwrap_or_default();
        self.record(
            format!("{}: {}", verb, description),
            EditMetadata::ToggleSubtask {
                project_id,
                task_id,
                subtask_id,
            },
        );
        true
    }

    fn subtask_description(&self, project_id: Uuid, task_id: Uuid, subtask_id: Uuid) -> String {
        self.graph
            .task(project_id, task_id)
            .and_then(|t| t.subtasks.iter().find(|s| s.id == subtask_id))
            .map(|s| s.description.clone())
            .unwrap_or_default()
    }

    pub fn update_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        subtask_id: Uuid,
        description: String,
    ) -> bool {
        let label = format!("Updated subtask: {}", description);
        let Some(old) =
            self.graph
                .update_subtask(project_id, task_id, subtask_id, description, self.clock.now())
        else {
            return false;
        };
        self.record(
            label,
            EditMetadata::UpdateSubtask {
                project_id,
                task_id,
                subtask_id,
                old: Box::new(old),
            },
        );
        true
    }

    /// Move a subtask up or down within its task, keeping it selected
    pub fn reorder_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        subtask_id: Uuid,
        offset: isize,
    ) -> bool {
        if !self
            .graph
            .reorder_subtask(project_id, task_id, subtask_id, offset, self.clock.now())
        {
            return false;
        }
        let description = self.subtask_description(project_id, task_id, subtask_id);
        self.record(
            format!("Reordered subtask: {}", description),
            EditMetadata::ReorderSubtask {
                project_id,
                task_id,
                subtask_id,
            },
        );
        self.select_target(RowTarget::Subtask {
            project_id,
            task_id,
            subtask_id,
        });
        true
    }

    pub fn move_subtask(
        &mut self,
        project_id: Uuid,
        from_task: Uuid,
        subtask_id: Uuid,
        to_task: Uuid,
    ) -> bool {
        if !self
            .graph
            .move_subtask_to_task(project_id, from_task, subtask_id, to_task, self.clock.now())
        {
            return false;
        }
        let description = self.subtask_description(project_id, to_task, subtask_id);
        self.record(
            format!("Moved subtask: {}", description),
            EditMetadata::MoveSubtask {
                project_id,
                from_task,
                to_task,
                subtask_id,
            },
        );
        self.clamp_selection();
        true
    }

    pub fn delete_subtask(&mut self, project_id: Uuid, task_id: Uuid, subtask_id: Uuid) -> bool {
        let Some(deleted) =
            self.graph
                .delete_subtask(project_id, task_id, subtask_id, self.clock.now())
        else {
            return false;
        };
        self.record(
            format!("Deleted subtask: {}", deleted.description),
            EditMetadata::DeleteSubtask {
                project_id,
                task_id,
                subtask_id,
            },
        );
        self.clamp_selection();
        true
    }

    // ---- goals ----

    pub fn create_goal(&mut self, draft: GoalDraft) -> Uuid {
        let title = draft.title.clone();
        let goal_id = self.graph.create_goal(draft, self.clock.now());
        self.record(
            format!("Created goal: {}", title),
            EditMetadata::CreateGoal { goal_id },
        );
        goal_id
    }

    pub fn update_goal(&mut self, goal_id: Uuid, draft: GoalDraft) -> bool {
        let title = draft.title.clone();
        let Some(old) = self.graph.update_goal(goal_id, draft, self.clock.now()) else {
            return false;
        };
        self.record(
            format!("Updated goal: {}", title),
            EditMetadata::UpdateGoal {
                goal_id,
                old: Box::new(old),
            },
        );
        true
    }

    pub fn delete_goal(&mut self, goal_id: Uuid) -> bool {
        let Some(deleted) = self.graph.delete_goal(goal_id) else {
            return false;
        };
        self.record(
            format!("Deleted goal: {}", deleted.title),
            EditMetadata::DeleteGoal {
                goal_id,
                deleted: Box::new(deleted),
            },
        );
        self.clamp_selection();
        true
    }

    /// Add a task to a goal's links. Linking twice is a no-op.
    pub fn link_task_to_goal(&mut self, goal_id: Uuid, link: TaskLink) -> bool {
        let Some(goal) = self.graph.goals.get(&goal_id) else {
            return false;
        };
        if goal.linked_tasks.contains(&link) {
            return false;
        }
        let mut linked_tasks = goal.linked_tasks.clone();
        linked_tasks.push(link);
        let draft = GoalDraft {
            title: goal.title.clone(),
            description: goal.description.clone(),
            due_date: goal.due_date,
            linked_tasks,
        };
        self.update_goal(goal_id, draft)
    }

    // ---- selection-driven actions ----

    /// Toggle the selected task or subtask
    pub fn toggle_selected(&mut self) -> bool {
        match self.selected_target() {
            Some(RowTarget::Task {
                project_id,
                task_id,
            }) if self.view != View::Archive => self.toggle_task(project_id, task_id),
            Some(RowTarget::Subtask {
                project_id,
                task_id,
                subtask_id,
            }) => self.toggle_subtask(project_id, task_id, subtask_id),
            _ => false,
        }
    }

    pub fn reorder_selected(&mut self, offset: isize) -> bool {
        match self.selected_target() {
            Some(RowTarget::Task {
                project_id,
                task_id,
            }) if matches!(self.view, View::Projects | View::Board) => {
                self.reorder_task(project_id, task_id, offset)
            }
            Some(RowTarget::Subtask {
                project_id,
                task_id,
                subtask_id,
            }) if matches!(self.view, View::Projects | View::Board) => {
                self.reorder_subtask(project_id, task_id, subtask_id, offset)
            }
            Some(RowTarget::Project { project_id }) if self.view == View::Projects => {
                self.reorder_project(project_id, offset)
            }
            _ => false,
        }
    }

    pub fn archive_selected_project(&mut self) -> bool {
        if self.view == View::Archive {
            return false;
        }
        match self.selected_target().and_then(|t| t.project_id()) {
            Some(project_id) => self.archive_project(project_id),
            None => false,
        }
    }

    pub fn move_selected_project_board(&mut self) -> bool {
        if self.view == View::Archive {
            return false;
        }
        match self.selected_target().and_then(|t| t.project_id()) {
            Some(project_id) => self.move_project_board(project_id),
            None => false,
        }
    }

    /// Restore the selected archive row
    pub fn restore_selected(&mut self) -> bool {
        if self.view != View::Archive {
            return false;
        }
        match self.selected_target() {
            Some(RowTarget::Project { project_id }) => self.restore_project(project_id),
            Some(RowTarget::Task {
                project_id,
                task_id,
            }) => self.restore_task(project_id, task_id),
            _ => false,
        }
    }

    /// Ask for confirmation before deleting the selected row
    pub fn request_delete(&mut self) {
        let Some(target) = self.selected_target() else {
            return;
        };
        let allowed = match self.view {
            View::Archive => false,
            View::Goals => matches!(target, RowTarget::Goal { .. }),
            _ => !matches!(target, RowTarget::Theme | RowTarget::Goal { .. }),
        };
        if allowed {
            self.pending_delete = Some(target);
            self.ui_mode = UiMode::ConfirmDelete;
            self.needs_render = true;
        }
    }

    /// Description of what the pending delete removes
    pub fn pending_delete_label(&self) -> Option<String> {
        let label = match self.pending_delete? {
            RowTarget::Project { project_id } => format!(
                "project '{}' and its sub-projects",
                self.graph.project_name(project_id).unwrap_or_default()
            ),
            RowTarget::Task {
                project_id,
                task_id,
            } => format!("task '{}'", self.task_description(project_id, task_id)),
            RowTarget::Subtask { .. } => "this subtask".to_string(),
            RowTarget::Goal { goal_id } => format!(
                "goal '{}'",
                self.graph
                    .goals
                    .get(&goal_id)
                    .map(|g| g.title.as_str())
                    .unwrap_or_default()
            ),
            RowTarget::Theme => return None,
        };
        Some(label)
    }

    pub fn confirm_delete(&mut self) -> bool {
        self.ui_mode = UiMode::Normal;
        self.needs_render = true;
        match self.pending_delete.take() {
            Some(RowTarget::Project { project_id }) => self.delete_project(project_id),
            Some(RowTarget::Task {
                project_id,
                task_id,
            }) => self.delete_task(project_id, task_id),
            Some(RowTarget::Subtask {
                project_id,
                task_id,
                subtask_id,
            }) => self.delete_subtask(project_id, task_id, subtask_id),
            Some(RowTarget::Goal { goal_id }) => self.delete_goal(goal_id),
            Some(RowTarget::Theme) | None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
        self.needs_render = true;
    }

    // ---- input forms ----

    fn open_form(&mut self, kind: FormKind, values: Vec<String>) {
        self.input_form = Some(InputFormState::new(kind, values));
        self.ui_mode = UiMode::Form;
        self.needs_render = true;
    }

    /// Open the project form; `as_child` pre-fills the selected project as parent
    pub fn start_new_project(&mut self, as_child: bool) {
        let parent = if as_child && self.view != View::Archive {
            self.selected_target()
                .and_then(|t| t.project_id())
                .and_then(|id| self.graph.project(id))
                .map(|p| p.name.clone())
        } else {
            None
        };
        let mut values = vec![String::new(); PROJECT_FIELDS.len()];
        values[7] = parent.unwrap_or_default();
        self.open_form(FormKind::NewProject, values);
    }

    pub fn start_add_task(&mut self) {
        let project_id = self
            .selected_target()
            .and_then(|t| t.project_id())
            .filter(|id| self.graph.project(*id).is_some());
        match project_id {
            Some(project_id) => self.open_form(FormKind::NewTask(project_id), Vec::new()),
            None => self.show_toast("Select a project first"),
        }
    }

    pub fn start_add_subtask(&mut self) {
        match self.selected_task().filter(|_| self.view != View::Archive) {
            Some((project_id, task_id)) => self.open_form(
                FormKind::NewSubtask {
                    project_id,
                    task_id,
                },
                Vec::new(),
            ),
            None => self.show_toast("Select a task first"),
        }
    }

    /// Open an edit form for the selected project, task or goal
    pub fn start_edit(&mut self) {
        if self.view == View::Archive {
            return;
        }
        match self.selected_target() {
            Some(RowTarget::Project { project_id }) => {
                let Some(project) = self.graph.project(project_id) else {
                    return;
                };
                let draft = project.to_draft();
                let parent = draft
                    .parent_id
                    .and_then(|id| self.graph.project_name(id))
                    .unwrap_or_default()
                    .to_string();
                let values = vec![
                    draft.name,
                    draft.description,
                    draft.theme,
                    draft.priority.label().to_string(),
                    draft.status.label().to_lowercase(),
                    date_text(draft.due_date),
                    hours_text(draft.estimated_time),
                    parent,
                ];
                self.open_form(FormKind::EditProject(project_id), values);
            }
            Some(RowTarget::Task {
                project_id,
                task_id,
            }) => {
                let Some(task) = self.graph.task(project_id, task_id) else {
                    return;
                };
                let values = vec![
                    task.description.clone(),
                    date_text(task.due_date),
                    task.priority.map(|p| p.label().to_string()).unwrap_or_default(),
                    hours_text(task.estimated_time),
                ];
                self.open_form(
                    FormKind::EditTask {
                        project_id,
                        task_id,
                    },
                    values,
                );
            }
            Some(RowTarget::Subtask {
                project_id,
                task_id,
                subtask_id,
            }) => {
                let description = self.subtask_description(project_id, task_id, subtask_id);
                self.open_form(
                    FormKind::EditSubtask {
                        project_id,
                        task_id,
                        subtask_id,
                    },
                    vec![description],
                );
            }
            Some(RowTarget::Goal { goal_id }) => {
                let Some(goal) = self.graph.goals.get(&goal_id) else {
                    return;
                };
                let values = vec![
                    goal.title.clone(),
                    goal.description.clone(),
                    date_text(goal.due_date),
                ];
                self.open_form(FormKind::EditGoal(goal_id), values);
            }
            _ => {}
        }
    }

    /// Open a move form for the selected subtask, or else the selected task
    pub fn start_move_task(&mut self) {
        if self.view == View::Archive {
            return;
        }
        if let Some(RowTarget::Subtask {
            project_id,
            task_id,
            subtask_id,
        }) = self.selected_target()
        {
            self.open_form(
                FormKind::MoveSubtask {
                    project_id,
                    task_id,
                    subtask_id,
                },
                Vec::new(),
            );
            return;
        }
        if let Some((project_id, task_id)) = self.selected_task() {
            self.open_form(
                FormKind::MoveTask {
                    project_id,
                    task_id,
                },
                Vec::new(),
            );
        }
    }

    pub fn start_new_goal(&mut self) {
        self.open_form(FormKind::NewGoal, Vec::new());
    }

    pub fn start_link_to_goal(&mut self) {
        if self.graph.goals.is_empty() {
            self.show_toast("Create a goal first");
            return;
        }
        if let Some((project_id, task_id)) = self.selected_task().filter(|_| self.view != View::Archive) {
            self.open_form(
                FormKind::LinkToGoal {
                    project_id,
                    task_id,
                },
                Vec::new(),
            );
        }
    }

    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.toggle_field();
            self.needs_render = true;
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.add_char(c);
            self.needs_render = true;
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.backspace();
            self.needs_render = true;
        }
    }

    /// Apply the form. Invalid input keeps the form open with an error.
    pub fn submit_input_form(&mut self) {
        let Some(mut form) = self.input_form.take() else {
            return;
        };
        match self.apply_form(&form) {
            Ok(()) => self.ui_mode = UiMode::Normal,
            Err(err) => {
                form.error = Some(err.to_string());
                self.input_form = Some(form);
            }
        }
        self.needs_render = true;
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
        self.needs_render = true;
    }

    fn apply_form(&mut self, form: &InputFormState) -> Result<()> {
        match form.kind {
            FormKind::NewProject => {
                let draft = self.project_draft(form, None)?;
                self.create_project(draft);
            }
            FormKind::EditProject(project_id) => {
                let draft = self.project_draft(form, Some(project_id))?;
                self.update_project(project_id, draft);
            }
            FormKind::NewTask(project_id) => {
                let draft = task_draft(form)?;
                self.add_task(project_id, draft);
            }
            FormKind::EditTask {
                project_id,
                task_id,
            } => {
                let draft = task_draft(form)?;
                self.update_task(project_id, task_id, draft);
            }
            FormKind::NewSubtask {
                project_id,
                task_id,
            } => {
                let description = form.value(0);
                if description.is_empty() {
                    bail!("Description is required");
                }
                self.add_subtask(project_id, task_id, description.to_string());
            }
            FormKind::EditSubtask {
                project_id,
                task_id,
                subtask_id,
            } => {
                let description = form.value(0);
                if description.is_empty() {
                    bail!("Description is required");
                }
                self.update_subtask(project_id, task_id, subtask_id, description.to_string());
            }
            FormKind::MoveSubtask {
                project_id,
                task_id,
                subtask_id,
            } => {
                let name = form.value(0);
                let target = self
                    .graph
                    .project(project_id)
                    .and_then(|p| {
                        p.tasks
                            .iter()
                            .find(|t| t.description.eq_ignore_ascii_case(name))
                    })
                    .map(|t| t.id)
                    .with_context(|| format!("No task named '{}' in this project", name))?;
                if !self.move_subtask(project_id, task_id, subtask_id, target) {
                    bail!("Subtask is already under '{}'", name);
                }
            }
            FormKind::MoveTask {
                project_id,
                task_id,
            } => {
                let name = form.value(0);
                let target = self
                    .graph
                    .find_project_by_name(name)
                    .with_context(|| format!("No project named '{}'", name))?;
                if !self.move_task(project_id, task_id, target) {
                    bail!("Task is already in '{}'", name);
                }
            }
            FormKind::NewGoal => {
                let draft = goal_draft(form, Vec::new())?;
                self.create_goal(draft);
            }
            FormKind::EditGoal(goal_id) => {
                let linked = self
                    .graph
                    .goals
                    .get(&goal_id)
                    .map(|g| g.linked_tasks.clone())
                    .unwrap_or_default();
                let draft = goal_draft(form, linked)?;
                self.update_goal(goal_id, draft);
            }
            FormKind::LinkToGoal {
                project_id,
                task_id,
            } => {
                let title = form.value(0).to_lowercase();
                let goal_id = self
                    .graph
                    .goals
                    .values()
                    .find(|g| g.title.to_lowercase() == title)
                    .map(|g| g.id)
                    .with_context(|| format!("No goal titled '{}'", form.value(0)))?;
                self.link_task_to_goal(
                    goal_id,
                    TaskLink {
                        project_id,
                        task_id,
                    },
                );
            }
        }
        Ok(())
    }

    fn project_draft(&self, form: &InputFormState, editing: Option<Uuid>) -> Result<ProjectDraft> {
        let name = form.value(0);
        if name.is_empty() {
            bail!("Name is required");
        }

        let board = form.value(4);
        let status = if board.is_empty() {
            BoardStatus::default()
        } else {
            BoardStatus::from_label(board).with_context(|| format!("Unknown board '{}'", board))?
        };

        let parent = form.value(7);
        let parent_id = if parent.is_empty() {
            None
        } else {
            let id = self
                .graph
                .find_project_by_name(parent)
                .with_context(|| format!("No project named '{}'", parent))?;
            if Some(id) == editing {
                bail!("A project cannot be its own parent");
            }
            Some(id)
        };

        Ok(ProjectDraft {
            name: name.to_string(),
            description: form.value(1).to_string(),
            theme: form.value(2).to_string(),
            priority: parse_priority(form.value(3))?.unwrap_or_default(),
            status,
            due_date: parse_date(form.value(5))?,
            estimated_time: parse_hours(form.value(6))?,
            parent_id,
        })
    }

    // ---- timers ----

    pub fn start_focus(&mut self) -> bool {
        self.check_for_day_change();
        let started = self.with_timers(|timers, ctx| timers.start_focus(ctx));
        if started {
            self.update_analytics();
            self.show_toast("Focus session started");
        }
        started
    }

    pub fn pause_focus(&mut self) -> bool {
        let now = self.clock.now();
        let paused = self.timers.pause_focus(now, self.store.as_ref());
        if paused {
            self.show_toast("Focus session paused");
        }
        paused
    }

    pub fn resume_focus(&mut self) -> bool {
        self.check_for_day_change();
        let now = self.clock.now();
        let resumed = self.timers.resume_focus(now, self.store.as_ref());
        if resumed {
            self.show_toast("Focus session resumed");
        }
        resumed
    }

    /// Pause a running session, resume a paused one, or start a new one
    pub fn toggle_focus(&mut self) -> bool {
        let focus = self.timers.focus();
        if focus.is_active {
            self.pause_focus()
        } else if focus.is_paused {
            self.resume_focus()
        } else {
            self.start_focus()
        }
    }

    pub fn stop_focus(&mut self) -> Option<u64> {
        let stopped = self.with_timers(|timers, ctx| timers.stop_focus(ctx));
        if let Some(secs) = stopped {
            self.update_analytics();
            self.show_toast(format!("Focus session saved: {}", format_clock(secs)));
        }
        stopped
    }

    pub fn start_pomodoro(&mut self, project_id: Option<Uuid>, task_id: Option<Uuid>) -> bool {
        let started = self.with_timers(|timers, ctx| timers.start_pomodoro(ctx, project_id, task_id));
        if started {
            self.update_analytics();
            self.show_toast("Pomodoro started");
        }
        started
    }

    /// Start a Pomodoro linked to the selected task, or unlinked when no task is selected
    pub fn start_pomodoro_on_selected(&mut self) -> bool {
        let (project_id, task_id) = match self.selected_task() {
            Some((project_id, task_id)) => (Some(project_id), Some(task_id)),
            None => (None, None),
        };
        self.start_pomodoro(project_id, task_id)
    }

    /// Pause or resume the countdown
    pub fn toggle_pomodoro(&mut self) -> bool {
        let store = self.store.as_ref();
        let toggled = if self.timers.pomodoro_paused() {
            self.timers.resume_pomodoro(self.clock.now(), store)
        } else {
            self.timers.pause_pomodoro(store)
        };
        if toggled {
            self.needs_render = true;
        }
        toggled
    }

    pub fn stop_pomodoro(&mut self) -> bool {
        let stopped = self.with_timers(|timers, ctx| timers.stop_pomodoro(ctx));
        if stopped {
            self.update_analytics();
            self.show_toast("Pomodoro stopped");
        }
        stopped
    }

    // ---- daily planning ----

    /// Open the planner when today has not been planned or skipped
    pub fn open_planner_if_needed(&mut self) -> bool {
        if !self.planning.needs_planning(self.clock.today()) {
            return false;
        }
        self.open_planner();
        true
    }

    pub fn open_planner(&mut self) {
        let suggestions = generate_task_suggestions(&self.graph, self.clock.today());
        self.planner = Some(PlannerState::new(suggestions));
        self.ui_mode = UiMode::Planner;
        self.needs_render = true;
    }

    /// Commit the chosen suggestions as today's plan
    pub fn start_day(&mut self) -> usize {
        let Some(planner) = self.planner.take() else {
            return 0;
        };
        let links = planner.chosen_links();
        let today = self.clock.today();
        let marked = self.planning.start_day(&mut self.graph, &links, today);
        save_or_warn(self.store.as_ref(), keys::DAILY_PLANNING, &self.planning);

        info!(planned = marked, "daily plan started");
        self.ui_mode = UiMode::Normal;
        self.needs_save = true;
        self.show_toast(format!("Planned {} tasks for today", marked));
        marked
    }

    pub fn skip_planning(&mut self) {
        self.planner = None;
        self.planning.skip(self.clock.today());
        save_or_warn(self.store.as_ref(), keys::DAILY_PLANNING, &self.planning);
        self.ui_mode = UiMode::Normal;
        self.needs_render = true;
    }

    // ---- persistence ----

    /// Save the graph
    pub fn save(&mut self) -> Result<()> {
        save_json(self.store.as_ref(), keys::GRAPH, &self.graph).context("Failed to save project graph")?;
        self.needs_save = false;
        Ok(())
    }

    /// Save every document; used on exit
    pub fn save_all(&mut self) -> Result<()> {
        let store = self.store.as_ref();
        save_json(store, keys::DAILY_STATS, &self.daily).context("Failed to save daily stats")?;
        save_json(store, keys::DAILY_PLANNING, &self.planning).context("Failed to save daily plan")?;
        save_json(store, keys::ANALYTICS, &self.analytics).context("Failed to save analytics")?;
        save_json(store, keys::DAY_CHANGE_DETECTOR, &self.detector)
            .context("Failed to save day change detector")?;
        self.timers.save(store).context("Failed to save timer sessions")?;
        self.save()
    }
}

fn task_draft(form: &InputFormState) -> Result<TaskDraft> {
    let description = form.value(0);
    if description.is_empty() {
        bail!("Description is required");
    }
    Ok(TaskDraft {
        description: description.to_string(),
        due_date: parse_date(form.value(1))?,
        priority: parse_priority(form.value(2))?,
        estimated_time: parse_hours(form.value(3))?,
    })
}

fn goal_draft(form: &InputFormState, linked_tasks: Vec<TaskLink>) -> Result<GoalDraft> {
    let title = form.value(0);
    if title.is_empty() {
        bail!("Title is required");
    }
    Ok(GoalDraft {
        title: title.to_string(),
        description: form.value(1).to_string(),
        due_date: parse_date(form.value(2))?,
        linked_tasks,
    })
}
