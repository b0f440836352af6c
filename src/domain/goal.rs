use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference from a goal to a task inside a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLink {
    pub project_id: Uuid,
    pub task_id: Uuid,
}

/// A longer-term objective tracked through linked tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub linked_tasks: Vec<TaskLink>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

/// Editable fields of a goal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub linked_tasks: Vec<TaskLink>,
}

/// Linked-task completion of a goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
}

impl Goal {
    pub fn from_draft(draft: GoalDraft, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            linked_tasks: draft.linked_tasks,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_draft(&mut self, draft: GoalDraft, now: DateTime<Local>) {
        self.title = draft.title;
        self.description = draft.description;
        self.due_date = draft.due_date;
        self.linked_tasks = draft.linked_tasks;
        self.updated_at = now;
    }

    /// Days until the due date; negative when overdue
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }

    /// Human label for the due date relative to today
    pub fn due_label(&self, today: NaiveDate) -> Option<String> {
        self.days_left(today).map(|days| match days {
            0 => "Due today".to_string(),
            d if d > 0 => format!("{} days left", d),
            d => format!("{} days overdue", -d),
        })
    }
}
