use crate::domain::{BoardStatus, Priority, TaskGraph, TaskLink};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most suggestions offered by the planner
pub const MAX_SUGGESTIONS: usize = 6;

/// Suggestions at or below this score are dropped
pub const MIN_SCORE: u32 = 10;

/// A task the user committed to for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub project_id: Uuid,
    pub task_id: Uuid,
    pub planned_date: NaiveDate,
}

/// Today's plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPlanning {
    pub last_planning_date: Option<NaiveDate>,
    pub planned_tasks: Vec<PlannedTask>,
    pub has_daily_plan: bool,
}

impl DailyPlanning {
    /// Whether the planner should open for `today`
    pub fn needs_planning(&self, today: NaiveDate) -> bool {
        self.last_planning_date != Some(today) && !self.has_daily_plan
    }

    /// Forget a plan made for another day. Returns true when one was dropped.
    pub fn reset_for(&mut self, today: NaiveDate) -> bool {
        if self.last_planning_date == Some(today) {
            return false;
        }
        self.has_daily_plan = false;
        self.planned_tasks.clear();
        true
    }

    /// Mark the selected tasks planned and record the plan
    pub fn start_day(&mut self, graph: &mut TaskGraph, selected: &[TaskLink], today: NaiveDate) -> usize {
        let marked = graph.mark_planned(selected);
        self.last_planning_date = Some(today);
        self.has_daily_plan = true;
        self.planned_tasks = selected
            .iter()
            .map(|link| PlannedTask {
                project_id: link.project_id,
                task_id: link.task_id,
                planned_date: today,
            })
            .collect();
        marked
    }

    /// Record that today was seen without making a plan
    pub fn skip(&mut self, today: NaiveDate) {
        self.last_planning_date = Some(today);
        self.has_daily_plan = false;
        self.planned_tasks.clear();
    }
}

/// Why a task was suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionReason {
    HighPriority,
    Overdue,
    DueToday,
    ActiveProject,
    QuickWin,
    General,
}

impl SuggestionReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighPriority => "High priority project",
            Self::Overdue => "Overdue task",
            Self::DueToday => "Due today",
            Self::ActiveProject => "Active project",
            Self::QuickWin => "Quick win (<=1h)",
            Self::General => "Suggested for today",
        }
    }
}

/// A scored candidate for today's plan
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub project_id: Uuid,
    pub task_id: Uuid,
    pub project_name: String,
    pub task_description: String,
    pub reason: SuggestionReason,
    pub score: u32,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub estimated_time: f64,
}

impl Suggestion {
    pub fn link(&self) -> TaskLink {
        TaskLink {
            project_id: self.project_id,
            task_id: self.task_id,
        }
    }
}

/// Score every open task and return the best few, highest first
pub fn generate_task_suggestions(graph: &TaskGraph, today: NaiveDate) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for project in graph.projects.values() {
        for task in project.tasks.iter().filter(|t| !t.completed) {
            let mut score = 0;
            let mut reason = None;

            match project.priority {
                Priority::High => {
                    score += 30;
                    reason = Some(SuggestionReason::HighPriority);
                }
                Priority::Medium => score += 15,
                Priority::Low => {}
            }

            // Due dates override the priority reason
            if let Some(due) = task.due_date {
                if due < today {
                    score += 50;
                    reason = Some(SuggestionReason::Overdue);
                } else if due == today {
                    score += 40;
                    reason = Some(SuggestionReason::DueToday);
                }
            }

            if project.status == BoardStatus::Execution {
                score += 20;
                reason.get_or_insert(SuggestionReason::ActiveProject);
            }

            if task.estimated_time > 0.0 && task.estimated_time <= 1.0 {
                score += 15;
                reason.get_or_insert(SuggestionReason::QuickWin);
            }

            if score > MIN_SCORE {
                suggestions.push(Suggestion {
                    project_id: project.id,
                    task_id: task.id,
                    project_name: project.name.clone(),
                    task_description: task.description.clone(),
                    reason: reason.unwrap_or(SuggestionReason::General),
                    score,
                    priority: project.priority,
                    due_date: task.due_date,
                    estimated_time: task.estimated_time,
                });
            }
        }
    }

    // Stable sort keeps graph order among equal scores
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
