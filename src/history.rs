use crate::domain::project::Subtask;
use crate::domain::{Goal, Project, Task, TaskGraph};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use tracing::{debug, info};
use uuid::Uuid;

/// Default number of snapshots kept
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// What an edit did. Descriptive only: replay restores the whole snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum EditMetadata {
    Initialization,
    CreateProject { project_id: Uuid },
    UpdateProject { project_id: Uuid, old: Box<Project> },
    DeleteProject { project_id: Uuid, deleted: Box<Project> },
    MoveProject { project_id: Uuid },
    ReorderProject { project_id: Uuid },
    ArchiveProject { project_id: Uuid },
    RestoreProject { project_id: Uuid },
    CreateTask { project_id: Uuid, task_id: Uuid },
    UpdateTask { project_id: Uuid, task_id: Uuid, old: Box<Task> },
    ToggleTask { project_id: Uuid, task_id: Uuid, was_completed: bool },
    DeleteTask { project_id: Uuid, task_id: Uuid, deleted: Box<Task> },
    ReorderTask { project_id: Uuid, task_id: Uuid },
    MoveTask { from_project: Uuid, to_project: Uuid, task_id: Uuid },
    RestoreTask { project_id: Uuid, task_id: Uuid },
    CreateSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    UpdateSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid, old: Box<Subtask> },
    ToggleSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    ReorderSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    MoveSubtask { project_id: Uuid, from_task: Uuid, to_task: Uuid, subtask_id: Uuid },
    DeleteSubtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    CreateGoal { goal_id: Uuid },
    UpdateGoal { goal_id: Uuid, old: Box<Goal> },
    DeleteGoal { goal_id: Uuid, deleted: Box<Goal> },
}

impl EditMetadata {
    /// Kind of item the edit touched
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Initialization => "start",
            Self::CreateProject { .. }
            | Self::UpdateProject { .. }
            | Self::DeleteProject { .. }
            | Self::MoveProject { .. }
            | Self::ReorderProject { .. }
            | Self::ArchiveProject { .. }
            | Self::RestoreProject { .. } => "project",
            Self::CreateTask { .. }
            | Self::UpdateTask { .. }
            | Self::ToggleTask { .. }
            | Self::DeleteTask { .. }
            | Self::ReorderTask { .. }
            | Self::MoveTask { .. }
            | Self::RestoreTask { .. } => "task",
            Self::CreateSubtask { .. }
            | Self::UpdateSubtask { .. }
            | Self::ToggleSubtask { .. }
            | Self::ReorderSubtask { .. }
            | Self::MoveSubtask { .. }
            | Self::DeleteSubtask { .. } => "subtask",
            Self::CreateGoal { .. } | Self::UpdateGoal { .. } | Self::DeleteGoal { .. } => "goal",
        }
    }
}

/// One recorded state of the graph
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub action: String,
    pub data: EditMetadata,
    pub snapshot: TaskGraph,
}

/// Linear undo/redo over whole-graph snapshots.
///
/// `current_index` points at the entry matching the live graph; `None`
/// means before the first entry. Recording after an undo discards the redo
/// branch. The oldest entry is evicted past `max_history_size`.
#[derive(Debug, Clone)]
pub struct UndoRedoSystem {
    history: VecDeque<HistoryEntry>,
    current_index: Option<usize>,
    max_history_size: usize,
    is_performing_undo_redo: bool,
}

impl Default for UndoRedoSystem {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl UndoRedoSystem {
    pub fn new(max_history_size: usize) -> Self {
        Self {
            history: VecDeque::new(),
            current_index: None,
            max_history_size: max_history_size.max(1),
            is_performing_undo_redo: false,
        }
    }

    /// Append a deep copy of `graph`, dropping any redo branch
    pub fn record_snapshot(
        &mut self,
        graph: &TaskGraph,
        action: impl Into<String>,
        data: EditMetadata,
        now: DateTime<Local>,
    ) {
        if self.is_performing_undo_redo {
            return;
        }

        let keep = self.current_index.map(|i| i + 1).unwrap_or(0);
        self.history.truncate(keep);

        let action = action.into();
        debug!(action = %action, "recording history snapshot");
        self.history.push_back(HistoryEntry {
            timestamp: now,
            action,
            data,
            snapshot: graph.clone(),
        });
        self.current_index = Some(self.history.len() - 1);

        if self.history.len() > self.max_history_size {
            self.history.pop_front();
            self.current_index = self.current_index.and_then(|i| i.checked_sub(1));
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        match self.current_index {
            Some(i) => i + 1 < self.history.len(),
            None => !self.is_empty(),
        }
    }

    /// Step back. Restores the previous snapshot into `graph` and returns
    /// "Undid: <label>"; stepping back past the first entry restores nothing.
    pub fn undo(&mut self, graph: &mut TaskGraph) -> Option<String> {
        let index = self.current_index?;

        self.is_performing_undo_redo = true;
        self.current_index = index.checked_sub(1);

        let message = self.current_index.map(|i| {
            let entry = &self.history[i];
            *graph = entry.snapshot.clone();
            format!("Undid: {}", entry.action)
        });
        self.is_performing_undo_redo = false;

        if let Some(msg) = &message {
            info!(index = ?self.current_index, "{}", msg);
        }
        message
    }

    /// Step forward and restore that snapshot, returning "Redid: <label>"
    pub fn redo(&mut self, graph: &mut TaskGraph) -> Option<String> {
        if !self.can_redo() {
            return None;
        }

        self.is_performing_undo_redo = true;
        let index = self.current_index.map(|i| i + 1).unwrap_or(0);
        self.current_index = Some(index);

        let entry = &self.history[index];
        *graph = entry.snapshot.clone();
        let message = format!("Redid: {}", entry.action);
        self.is_performing_undo_redo = false;

        info!(index, "{}", message);
        Some(message)
    }

    pub fn is_performing_undo_redo(&self) -> bool {
        self.is_performing_undo_redo
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current_index.and_then(|i| self.history.get(i))
    }

    /// Label of the entry redo would restore
    pub fn next_redo_label(&self) -> Option<&str> {
        let next = self.current_index.map(|i| i + 1).unwrap_or(0);
        self.history.get(next).map(|e| e.action.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::domain::ProjectDraft;
    use pretty_assertions::assert_eq;

    fn clock() -> ManualClock {
        ManualClock::at(2026, 10, 1, 12, 0, 0)
    }

    fn add(graph: &mut TaskGraph, name: &str, now: DateTime<Local>) -> Uuid {
        graph.create_project(
            ProjectDraft {
                name: name.to_string(),
                ..Default::default()
            },
            now,
        )
    }

    fn names(graph: &TaskGraph) -> Vec<String> {
        let mut names: Vec<String> = graph.projects.values().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    /// Initial state plus three creates A, B, C
    fn abc() -> (TaskGraph, UndoRedoSystem, ManualClock) {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let mut history = UndoRedoSystem::default();
        history.record_snapshot(&graph, "Initial state", EditMetadata::Initialization, clock.now());
        for name in ["A", "B", "C"] {
            let id = add(&mut graph, name, clock.now());
            history.record_snapshot(
                &graph,
                format!("Created project: {}", name),
                EditMetadata::CreateProject { project_id: id },
                clock.now(),
            );
        }
        (graph, history, clock)
    }

    #[test]
    fn test_empty_history() {
        let mut graph = TaskGraph::default();
        let mut history = UndoRedoSystem::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(&mut graph), None);
        assert_eq!(history.redo(&mut graph), None);
    }

    #[test]
    fn test_undo_twice_then_redo_once() {
        let (mut graph, mut history, _clock) = abc();

        assert_eq!(history.undo(&mut graph).as_deref(), Some("Undid: Created project: B"));
        assert_eq!(names(&graph), vec!["A", "B"]);
        assert_eq!(history.undo(&mut graph).as_deref(), Some("Undid: Created project: A"));
        assert_eq!(names(&graph), vec!["A"]);

        assert_eq!(history.redo(&mut graph).as_deref(), Some("Redid: Created project: B"));
        assert_eq!(names(&graph), vec!["A", "B"]);
        assert_eq!(history.current_index(), Some(2));
        assert!(history.can_redo());
    }

    #[test]
    fn test_new_edit_discards_redo_branch() {
        let (mut graph, mut history, clock) = abc();
        history.undo(&mut graph);
        history.undo(&mut graph);

        let d = add(&mut graph, "D", clock.now());
        history.record_snapshot(
            &graph,
            "Created project: D",
            EditMetadata::CreateProject { project_id: d },
            clock.now(),
        );

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut graph), None);
        assert_eq!(names(&graph), vec!["A", "D"]);
    }

    #[test]
    fn test_undo_from_first_entry_restores_nothing() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let mut history = UndoRedoSystem::default();
        history.record_snapshot(&graph, "Initial state", EditMetadata::Initialization, clock.now());
        add(&mut graph, "Unrecorded", clock.now());

        assert_eq!(history.undo(&mut graph), None);
        assert_eq!(history.current_index(), None);
        // The live graph is left as it was
        assert_eq!(names(&graph), vec!["Unrecorded"]);
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut graph).as_deref(), Some("Redid: Initial state"));
        assert!(graph.projects.is_empty());
    }

    #[test]
    fn test_eviction_keeps_index_on_newest() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let mut history = UndoRedoSystem::new(3);
        for i in 0..5 {
            let id = add(&mut graph, &format!("P{}", i), clock.now());
            history.record_snapshot(
                &graph,
                format!("Created project: P{}", i),
                EditMetadata::CreateProject { project_id: id },
                clock.now(),
            );
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), Some(2));
        assert_eq!(history.current().unwrap().action, "Created project: P4");
        let labels: Vec<&str> = history.entries().map(|e| e.action.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Created project: P2", "Created project: P3", "Created project: P4"]
        );
    }

    #[test]
    fn test_snapshots_are_deep_copies() {
        let (mut graph, mut history, clock) = abc();
        // Mutate live graph without recording
        let stray = add(&mut graph, "Stray", clock.now());
        graph.projects.get_mut(&stray).unwrap().name = "Changed".to_string();

        history.undo(&mut graph);
        assert_eq!(names(&graph), vec!["A", "B"]);
        history.redo(&mut graph);
        assert_eq!(names(&graph), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_undo_redo_round_trip_restores_equal_graph() {
        let (mut graph, mut history, _clock) = abc();
        let before = graph.clone();
        history.undo(&mut graph);
        history.redo(&mut graph);
        assert_eq!(graph, before);
        assert!(!history.is_performing_undo_redo());
    }
}
