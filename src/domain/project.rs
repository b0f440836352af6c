use super::enums::{BoardStatus, Priority};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A checklist entry under a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Uuid,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            completed: false,
        }
    }
}

/// A unit of work inside a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Estimated effort in hours
    #[serde(default)]
    pub estimated_time: f64,
    /// Logged effort in hours
    #[serde(default)]
    pub actual_time: f64,
    #[serde(default)]
    pub planned_for_today: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(description: String, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            completed: false,
            created_at: now,
            completed_at: None,
            due_date: None,
            priority: None,
            estimated_time: 0.0,
            actual_time: 0.0,
            planned_for_today: false,
            subtasks: Vec::new(),
        }
    }

    /// Flip completion, stamping or clearing `completed_at`
    pub fn toggle(&mut self, now: DateTime<Local>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }

    /// Whether the task was completed on the given calendar date
    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.completed
            && self
                .completed_at
                .map(|at| at.date_naive() == date)
                .unwrap_or(false)
    }

    /// Subtasks done / total
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.map(|d| d < today).unwrap_or(false)
    }
}

/// Editable fields of a project, shared by create and update
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub status: BoardStatus,
    pub theme: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_time: f64,
    pub parent_id: Option<Uuid>,
}

/// A project on one of the two boards, optionally nested under a parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: BoardStatus,
    /// Aspect label used to group top-level projects
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_time: f64,
    #[serde(default)]
    pub actual_time: f64,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub child_projects: Vec<Uuid>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
    /// Sort key within an aspect group
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub archived_at: Option<DateTime<Local>>,
}

impl Project {
    pub fn from_draft(draft: ProjectDraft, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            theme: draft.theme,
            due_date: draft.due_date,
            estimated_time: draft.estimated_time,
            actual_time: 0.0,
            parent_id: draft.parent_id,
            child_projects: Vec::new(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            order: now.timestamp_millis(),
            archived_at: None,
        }
    }

    /// Overwrite the editable fields, keeping tasks, children and timestamps
    pub fn apply_draft(&mut self, draft: ProjectDraft, now: DateTime<Local>) {
        self.name = draft.name;
        self.description = draft.description;
        self.priority = draft.priority;
        self.status = draft.status;
        self.theme = draft.theme;
        self.due_date = draft.due_date;
        self.estimated_time = draft.estimated_time;
        self.parent_id = draft.parent_id;
        self.updated_at = now;
    }

    /// Editable fields as a draft (for pre-filling the edit form)
    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            theme: self.theme.clone(),
            due_date: self.due_date,
            estimated_time: self.estimated_time,
            parent_id: self.parent_id,
        }
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    pub fn task_position(&self, task_id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Completed / total task counts
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.completed).count();
        (done, self.tasks.len())
    }

    /// A project with tasks where every task is done
    pub fn is_fully_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    pub fn touch(&mut self, now: DateTime<Local>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn clock() -> ManualClock {
        ManualClock::at(2026, 4, 2, 9, 30, 0)
    }

    #[test]
    fn test_task_toggle_stamps_completion() {
        let clock = clock();
        let mut task = Task::new("Write report".to_string(), clock.now());

        task.toggle(clock.now());
        assert!(task.completed);
        assert!(task.completed_on(clock.today()));

        task.toggle(clock.now());
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_task_overdue() {
        let clock = clock();
        let mut task = Task::new("File taxes".to_string(), clock.now());
        task.due_date = clock.today().pred_opt();
        assert!(task.is_overdue(clock.today()));

        task.toggle(clock.now());
        assert!(!task.is_overdue(clock.today()));
    }

    #[test]
    fn test_apply_draft_keeps_tasks() {
        let clock = clock();
        let mut project = Project::from_draft(
            ProjectDraft {
                name: "Garden".to_string(),
                ..Default::default()
            },
            clock.now(),
        );
        project.tasks.push(Task::new("Plant".to_string(), clock.now()));

        let mut draft = project.to_draft();
        draft.name = "Backyard".to_string();
        draft.priority = Priority::High;
        project.apply_draft(draft, clock.now());

        assert_eq!(project.name, "Backyard");
        assert_eq!(project.priority, Priority::High);
        assert_eq!(project.tasks.len(), 1);
    }

    #[test]
    fn test_fully_completed_requires_tasks() {
        let clock = clock();
        let mut project = Project::from_draft(ProjectDraft::default(), clock.now());
        assert!(!project.is_fully_completed());

        let mut task = Task::new("Only".to_string(), clock.now());
        task.toggle(clock.now());
        project.tasks.push(task);
        assert!(project.is_fully_completed());
        assert_eq!(project.progress(), (1, 1));
    }

    #[test]
    fn test_task_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "6a2f41a3-c54b-4e2a-9c3e-1d2b3c4d5e6f",
            "description": "Legacy task",
            "created_at": "2026-04-01T10:00:00+00:00"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
        assert!(task.subtasks.is_empty());
        assert_eq!(task.estimated_time, 0.0);
    }
}
