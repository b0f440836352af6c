use super::enums::{BoardStatus, Priority};
use super::goal::{Goal, GoalDraft, GoalProgress, TaskLink};
use super::project::{Project, ProjectDraft, Subtask, Task};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Editable fields of a task
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub estimated_time: f64,
}

/// Aggregate counts over live and archived work
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphStats {
    pub total_projects: usize,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

impl GraphStats {
    /// Completion rate in whole percent
    pub fn completion_rate(&self) -> u32 {
        if self.total_tasks == 0 {
            return 0;
        }
        ((self.completed_tasks as f64 / self.total_tasks as f64) * 100.0).round() as u32
    }
}

/// Everything undo/redo snapshots: projects, goals and the archive
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskGraph {
    #[serde(default)]
    pub projects: BTreeMap<Uuid, Project>,
    #[serde(default)]
    pub goals: BTreeMap<Uuid, Goal>,
    /// Archived tasks grouped by the project they came from
    #[serde(default)]
    pub archived_tasks: BTreeMap<Uuid, Vec<Task>>,
    #[serde(default)]
    pub archived_projects: BTreeMap<Uuid, Project>,
}

impl TaskGraph {
    // ---- lookups ----

    pub fn project(&self, project_id: Uuid) -> Option<&Project> {
        self.projects.get(&project_id)
    }

    pub fn task(&self, project_id: Uuid, task_id: Uuid) -> Option<&Task> {
        self.projects.get(&project_id)?.task(task_id)
    }

    fn task_mut(&mut self, project_id: Uuid, task_id: Uuid) -> Option<&mut Task> {
        self.projects.get_mut(&project_id)?.task_mut(task_id)
    }

    /// Whether `candidate` is `ancestor` or sits anywhere below it
    pub fn is_descendant_of(&self, ancestor: Uuid, candidate: Uuid) -> bool {
        let mut current = Some(candidate);
        let mut hops = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.projects.len() {
                // Parent chain loops; treat as unrelated
                return false;
            }
            current = self.projects.get(&id).and_then(|p| p.parent_id);
        }
        false
    }

    /// Top-level projects grouped by theme, each group sorted by `order`
    pub fn projects_by_theme(&self) -> Vec<(String, Vec<&Project>)> {
        let mut groups: BTreeMap<String, Vec<&Project>> = BTreeMap::new();
        for project in self.projects.values() {
            let is_root = project
                .parent_id
                .map(|p| !self.projects.contains_key(&p))
                .unwrap_or(true);
            if is_root {
                groups.entry(project.theme.clone()).or_default().push(project);
            }
        }
        groups
            .into_iter()
            .map(|(theme, mut list)| {
                list.sort_by_key(|p| (p.order, p.created_at));
                (theme, list)
            })
            .collect()
    }

    /// Direct children of a project that are still live, in `order`
    pub fn children_of(&self, project_id: Uuid) -> Vec<&Project> {
        let Some(project) = self.projects.get(&project_id) else {
            return Vec::new();
        };
        let mut children: Vec<&Project> = project
            .child_projects
            .iter()
            .filter_map(|id| self.projects.get(id))
            .collect();
        children.sort_by_key(|p| (p.order, p.created_at));
        children
    }

    /// Projects on a board, sorted by name
    pub fn projects_on_board(&self, status: BoardStatus) -> Vec<&Project> {
        let mut list: Vec<&Project> = self
            .projects
            .values()
            .filter(|p| p.status == status)
            .collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        list
    }

    /// Find a live project by case-insensitive name
    pub fn find_project_by_name(&self, name: &str) -> Option<Uuid> {
        let wanted = name.trim().to_lowercase();
        self.projects
            .values()
            .find(|p| p.name.to_lowercase() == wanted)
            .map(|p| p.id)
    }

    // ---- projects ----

    /// Insert a new project and link it under its parent if that parent exists
    pub fn create_project(&mut self, mut draft: ProjectDraft, now: DateTime<Local>) -> Uuid {
        if let Some(parent_id) = draft.parent_id {
            if !self.projects.contains_key(&parent_id) {
                draft.parent_id = None;
            }
        }

        let project = Project::from_draft(draft, now);
        let id = project.id;
        if let Some(parent_id) = project.parent_id {
            if let Some(parent) = self.projects.get_mut(&parent_id) {
                parent.child_projects.push(id);
            }
        }
        self.projects.insert(id, project);
        id
    }

    /// Update editable fields, maintaining parent/child links. Returns the old project.
    ///
    /// A parent that would create a cycle (the project itself or one of its
    /// descendants) or that does not exist is ignored and the old parent kept.
    pub fn update_project(
        &mut self,
        project_id: Uuid,
        mut draft: ProjectDraft,
        now: DateTime<Local>,
    ) -> Option<Project> {
        let old = self.projects.get(&project_id)?.clone();

        if let Some(new_parent) = draft.parent_id {
            if !self.projects.contains_key(&new_parent) || self.is_descendant_of(project_id, new_parent)
            {
                draft.parent_id = old.parent_id;
            }
        }

        if old.parent_id != draft.parent_id {
            if let Some(old_parent) = old.parent_id.and_then(|id| self.projects.get_mut(&id)) {
                old_parent.child_projects.retain(|c| *c != project_id);
            }
            if let Some(new_parent) = draft.parent_id.and_then(|id| self.projects.get_mut(&id)) {
                if !new_parent.child_projects.contains(&project_id) {
                    new_parent.child_projects.push(project_id);
                }
            }
        }

        if let Some(project) = self.projects.get_mut(&project_id) {
            project.apply_draft(draft, now);
        }
        Some(old)
    }

    /// Delete a project and all of its descendants. Returns the deleted root.
    pub fn delete_project(&mut self, project_id: Uuid) -> Option<Project> {
        let root = self.projects.get(&project_id)?.clone();

        let mut stack = root.child_projects.clone();
        while let Some(child_id) = stack.pop() {
            if let Some(child) = self.projects.remove(&child_id) {
                stack.extend(child.child_projects);
                self.archived_tasks.remove(&child_id);
            }
        }

        if let Some(parent) = root.parent_id.and_then(|id| self.projects.get_mut(&id)) {
            parent.child_projects.retain(|c| *c != project_id);
        }

        self.projects.remove(&project_id);
        self.archived_tasks.remove(&project_id);
        Some(root)
    }

    /// Siblings in display order: children of the same live parent, or roots sharing a theme
    fn sibling_ids(&self, project_id: Uuid) -> Option<Vec<Uuid>> {
        let project = self.projects.get(&project_id)?;
        let siblings = match project.parent_id.filter(|id| self.projects.contains_key(id)) {
            Some(parent_id) => self.children_of(parent_id),
            None => self
                .projects_by_theme()
                .into_iter()
                .find(|(theme, _)| *theme == project.theme)
                .map(|(_, list)| list)
                .unwrap_or_default(),
        };
        Some(siblings.iter().map(|p| p.id).collect())
    }

    /// Move a project up (negative) or down (positive) among its siblings.
    /// Sibling `order` values are renumbered in steps of 1000.
    pub fn reorder_project(&mut self, project_id: Uuid, offset: isize, now: DateTime<Local>) -> bool {
        let Some(mut ids) = self.sibling_ids(project_id) else {
            return false;
        };
        let Some(from) = ids.iter().position(|id| *id == project_id) else {
            return false;
        };
        let to = from as isize + offset;
        if to < 0 || to as usize >= ids.len() || offset == 0 {
            return false;
        }
        let id = ids.remove(from);
        ids.insert(to as usize, id);

        for (index, id) in ids.iter().enumerate() {
            if let Some(project) = self.projects.get_mut(id) {
                project.order = (index as i64 + 1) * 1000;
            }
        }
        if let Some(project) = self.projects.get_mut(&project_id) {
            project.touch(now);
        }
        true
    }

    /// Flip a project between execution and incubation. Returns the new board.
    pub fn move_project_board(&mut self, project_id: Uuid, now: DateTime<Local>) -> Option<BoardStatus> {
        let project = self.projects.get_mut(&project_id)?;
        project.status = project.status.toggled();
        project.touch(now);
        Some(project.status)
    }

    // ---- tasks ----

    /// Append a task to a project
    pub fn add_task(&mut self, project_id: Uuid, draft: TaskDraft, now: DateTime<Local>) -> Option<Uuid> {
        let project = self.projects.get_mut(&project_id)?;
        let mut task = Task::new(draft.description, now);
        task.due_date = draft.due_date;
        task.priority = draft.priority;
        task.estimated_time = draft.estimated_time;
        let id = task.id;
        project.tasks.push(task);
        project.touch(now);
        Some(id)
    }

    /// Update a task's editable fields. Returns the old task.
    pub fn update_task(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        draft: TaskDraft,
        now: DateTime<Local>,
    ) -> Option<Task> {
        let project = self.projects.get_mut(&project_id)?;
        let task = project.task_mut(task_id)?;
        let old = task.clone();
        task.description = draft.description;
        task.due_date = draft.due_date;
        task.priority = draft.priority;
        task.estimated_time = draft.estimated_time;
        project.touch(now);
        Some(old)
    }

    /// Toggle completion. Returns the previous completion flag.
    pub fn toggle_task(&mut self, project_id: Uuid, task_id: Uuid, now: DateTime<Local>) -> Option<bool> {
        let project = self.projects.get_mut(&project_id)?;
        let task = project.task_mut(task_id)?;
        let was_completed = task.completed;
        task.toggle(now);
        project.touch(now);
        Some(was_completed)
    }

    pub fn delete_task(&mut self, project_id: Uuid, task_id: Uuid, now: DateTime<Local>) -> Option<Task> {
        let project = self.projects.get_mut(&project_id)?;
        let index = project.task_position(task_id)?;
        let task = project.tasks.remove(index);
        project.touch(now);
        Some(task)
    }

    /// Move a task up (negative) or down (positive) within its project
    pub fn reorder_task(&mut self, project_id: Uuid, task_id: Uuid, offset: isize, now: DateTime<Local>) -> bool {
        let Some(project) = self.projects.get_mut(&project_id) else {
            return false;
        };
        let Some(from) = project.task_position(task_id) else {
            return false;
        };
        let to = from as isize + offset;
        if to < 0 || to as usize >= project.tasks.len() || offset == 0 {
            return false;
        }
        let task = project.tasks.remove(from);
        project.tasks.insert(to as usize, task);
        project.touch(now);
        true
    }

    /// Move a task to the end of another live project
    pub fn move_task_to_project(
        &mut self,
        source_id: Uuid,
        task_id: Uuid,
        target_id: Uuid,
        now: DateTime<Local>,
    ) -> bool {
        if source_id == target_id || !self.projects.contains_key(&target_id) {
            return false;
        }
        let Some(task) = self.delete_task(source_id, task_id, now) else {
            return false;
        };
        if let Some(target) = self.projects.get_mut(&target_id) {
            target.tasks.push(task);
            target.touch(now);
        }

        // Keep goal links pointing at the task's new home
        for goal in self.goals.values_mut() {
            for link in goal.linked_tasks.iter_mut() {
                if link.task_id == task_id && link.project_id == source_id {
                    link.project_id = target_id;
                }
            }
        }
        true
    }

    /// Add logged hours to a task and its project. Both must exist.
    pub fn log_time(&mut self, project_id: Uuid, task_id: Uuid, hours: f64) -> bool {
        let Some(project) = self.projects.get_mut(&project_id) else {
            return false;
        };
        let Some(task) = project.task_mut(task_id) else {
            return false;
        };
        task.actual_time += hours;
        project.actual_time += hours;
        true
    }

    // ---- subtasks ----

    pub fn add_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        description: String,
        now: DateTime<Local>,
    ) -> Option<Uuid> {
        let project = self.projects.get_mut(&project_id)?;
        let task = project.task_mut(task_id)?;
        let subtask = Subtask::new(description);
        let id = subtask.id;
        task.subtasks.push(subtask);
        project.touch(now);
        Some(id)
    }

    /// Toggle a subtask. Returns the previous completion flag.
    pub fn toggle_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        subtask_id: Uuid,
        now: DateTime<Local>,
    ) -> Option<bool> {
        let project = self.projects.get_mut(&project_id)?;
        let subtask = project
            .task_mut(task_id)?
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)?;
        let was_completed = subtask.completed;
        subtask.completed = !was_completed;
        project.touch(now);
        Some(was_completed)
    }

    pub fn delete_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        subtask_id: Uuid,
        now: DateTime<Local>,
    ) -> Option<Subtask> {
        let project = self.projects.get_mut(&project_id)?;
        let task = project.task_mut(task_id)?;
        let index = task.subtasks.iter().position(|s| s.id == subtask_id)?;
        let removed = task.subtasks.remove(index);
        project.touch(now);
        Some(removed)
    }

    /// Change a subtask's description. Returns the old subtask.
    pub fn update_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        subtask_id: Uuid,
        description: String,
        now: DateTime<Local>,
    ) -> Option<Subtask> {
        let project = self.projects.get_mut(&project_id)?;
        let subtask = project
            .task_mut(task_id)?
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)?;
        let old = subtask.clone();
        subtask.description = description;
        project.touch(now);
        Some(old)
    }

    /// Move a subtask up (negative) or down (positive) within its task
    pub fn reorder_subtask(
        &mut self,
        project_id: Uuid,
        task_id: Uuid,
        subtask_id: Uuid,
        offset: isize,
        now: DateTime<Local>,
    ) -> bool {
        let Some(project) = self.projects.get_mut(&project_id) else {
            return false;
        };
        let Some(task) = project.task_mut(task_id) else {
            return false;
        };
        let Some(from) = task.subtasks.iter().position(|s| s.id == subtask_id) else {
            return false;
        };
        let to = from as isize + offset;
        if to < 0 || to as usize >= task.subtasks.len() || offset == 0 {
            return false;
        }
        let subtask = task.subtasks.remove(from);
        task.subtasks.insert(to as usize, subtask);
        project.touch(now);
        true
    }

    /// Move a subtask to the end of another task in the same project
    pub fn move_subtask_to_task(
        &mut self,
        project_id: Uuid,
        from_task: Uuid,
        subtask_id: Uuid,
        to_task: Uuid,
        now: DateTime<Local>,
    ) -> bool {
        if from_task == to_task {
            return false;
        }
        let Some(project) = self.projects.get_mut(&project_id) else {
            return false;
        };
        if project.task(to_task).is_none() {
            return false;
        }
        let Some(source) = project.task_mut(from_task) else {
            return false;
        };
        let Some(index) = source.subtasks.iter().position(|s| s.id == subtask_id) else {
            return false;
        };
        let subtask = source.subtasks.remove(index);
        if let Some(target) = project.task_mut(to_task) {
            target.subtasks.push(subtask);
        }
        project.touch(now);
        true
    }

    // ---- archive ----

    /// Move a project's completed tasks into the archive. Returns how many moved.
    pub fn archive_completed_tasks(&mut self, project_id: Uuid, now: DateTime<Local>) -> usize {
        let Some(project) = self.projects.get_mut(&project_id) else {
            return 0;
        };
        let (done, open): (Vec<Task>, Vec<Task>) =
            project.tasks.drain(..).partition(|t| t.completed);
        project.tasks = open;
        if done.is_empty() {
            return 0;
        }
        project.touch(now);
        let count = done.len();
        self.archived_tasks.entry(project_id).or_default().extend(done);
        count
    }

    /// Move a project and all of its tasks into the archive
    pub fn archive_project(&mut self, project_id: Uuid, now: DateTime<Local>) -> bool {
        let Some(mut project) = self.projects.remove(&project_id) else {
            return false;
        };
        if !project.tasks.is_empty() {
            let tasks = std::mem::take(&mut project.tasks);
            self.archived_tasks.entry(project_id).or_default().extend(tasks);
        }
        project.archived_at = Some(now);
        self.archived_projects.insert(project_id, project);
        true
    }

    /// Bring an archived task back as incomplete, restoring its project if that was archived too
    pub fn restore_task(&mut self, project_id: Uuid, task_id: Uuid, now: DateTime<Local>) -> bool {
        let Some(archived) = self.archived_tasks.get_mut(&project_id) else {
            return false;
        };
        let Some(index) = archived.iter().position(|t| t.id == task_id) else {
            return false;
        };

        if !self.projects.contains_key(&project_id) && !self.archived_projects.contains_key(&project_id)
        {
            // Owner is gone for good; nowhere to restore to
            return false;
        }

        let mut task = archived.remove(index);
        if archived.is_empty() {
            self.archived_tasks.remove(&project_id);
        }
        task.completed = false;
        task.completed_at = None;

        if let Some(mut project) = self.archived_projects.remove(&project_id) {
            project.archived_at = None;
            self.projects.insert(project_id, project);
        }
        if let Some(project) = self.projects.get_mut(&project_id) {
            project.tasks.push(task);
            project.touch(now);
        }
        true
    }

    /// Bring an archived project back together with all of its archived tasks
    pub fn restore_project(&mut self, project_id: Uuid, now: DateTime<Local>) -> bool {
        let Some(mut project) = self.archived_projects.remove(&project_id) else {
            return false;
        };
        project.archived_at = None;
        project.touch(now);
        if let Some(tasks) = self.archived_tasks.remove(&project_id) {
            project.tasks.extend(tasks);
        }
        self.projects.insert(project_id, project);
        true
    }

    /// Display name of a project, live or archived
    pub fn project_name(&self, project_id: Uuid) -> Option<&str> {
        self.projects
            .get(&project_id)
            .or_else(|| self.archived_projects.get(&project_id))
            .map(|p| p.name.as_str())
    }

    // ---- goals ----

    pub fn create_goal(&mut self, draft: GoalDraft, now: DateTime<Local>) -> Uuid {
        let goal = Goal::from_draft(draft, now);
        let id = goal.id;
        self.goals.insert(id, goal);
        id
    }

    /// Returns the old goal
    pub fn update_goal(&mut self, goal_id: Uuid, draft: GoalDraft, now: DateTime<Local>) -> Option<Goal> {
        let goal = self.goals.get_mut(&goal_id)?;
        let old = goal.clone();
        goal.apply_draft(draft, now);
        Some(old)
    }

    pub fn delete_goal(&mut self, goal_id: Uuid) -> Option<Goal> {
        self.goals.remove(&goal_id)
    }

    /// Completion of a goal's linked tasks. Links to missing tasks count as not done.
    pub fn goal_progress(&self, goal: &Goal) -> GoalProgress {
        let total = goal.linked_tasks.len();
        let completed = goal
            .linked_tasks
            .iter()
            .filter(|link| {
                self.task(link.project_id, link.task_id)
                    .map(|t| t.completed)
                    .unwrap_or(false)
            })
            .count();
        let percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        GoalProgress {
            completed,
            total,
            percentage,
        }
    }

    // ---- daily bookkeeping ----

    /// Number of tasks completed on `date`, including ones already archived
    pub fn tasks_completed_on(&self, date: NaiveDate) -> u32 {
        self.projects
            .values()
            .chain(self.archived_projects.values())
            .flat_map(|p| p.tasks.iter())
            .chain(self.archived_tasks.values().flatten())
            .filter(|t| t.completed_on(date))
            .count() as u32
    }

    /// Clear every `planned_for_today` flag
    pub fn clear_planned_flags(&mut self) {
        for task in self.projects.values_mut().flat_map(|p| p.tasks.iter_mut()) {
            task.planned_for_today = false;
        }
    }

    /// Set `planned_for_today` on the linked tasks that exist. Returns how many were marked.
    pub fn mark_planned(&mut self, links: &[TaskLink]) -> usize {
        links
            .iter()
            .filter(|link| match self.task_mut(link.project_id, link.task_id) {
                Some(task) => {
                    task.planned_for_today = true;
                    true
                }
                None => false,
            })
            .count()
    }

    /// Tasks planned for today, with their project
    pub fn planned_tasks(&self) -> Vec<(&Project, &Task)> {
        self.projects
            .values()
            .flat_map(|p| p.tasks.iter().map(move |t| (p, t)))
            .filter(|(_, t)| t.planned_for_today)
            .collect()
    }

    /// Counts across live projects and the archive; archived tasks count as done
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_projects: self.projects.len() + self.archived_projects.len(),
            ..Default::default()
        };
        for task in self.projects.values().flat_map(|p| p.tasks.iter()) {
            stats.total_tasks += 1;
            if task.completed {
                stats.completed_tasks += 1;
            }
        }
        let archived: usize = self.archived_tasks.values().map(|v| v.len()).sum::<usize>()
            + self
                .archived_projects
                .values()
                .map(|p| p.tasks.len())
                .sum::<usize>();
        stats.total_tasks += archived;
        stats.completed_tasks += archived;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use pretty_assertions::assert_eq;

    fn clock() -> ManualClock {
        ManualClock::at(2026, 5, 4, 10, 0, 0)
    }

    fn named(name: &str) -> ProjectDraft {
        ProjectDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn task(description: &str) -> TaskDraft {
        TaskDraft {
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_child_links_parent() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let parent = graph.create_project(named("Home"), clock.now());
        let child = graph.create_project(
            ProjectDraft {
                parent_id: Some(parent),
                ..named("Kitchen")
            },
            clock.now(),
        );

        assert_eq!(graph.projects[&parent].child_projects, vec![child]);
        assert_eq!(graph.children_of(parent)[0].id, child);
        // Only the parent is a root
        let groups = graph.projects_by_theme();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 1);
    }

    #[test]
    fn test_create_with_missing_parent_becomes_root() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let id = graph.create_project(
            ProjectDraft {
                parent_id: Some(Uuid::new_v4()),
                ..named("Orphan")
            },
            clock.now(),
        );
        assert_eq!(graph.projects[&id].parent_id, None);
    }

    #[test]
    fn test_update_project_moves_between_parents() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let a = graph.create_project(named("A"), clock.now());
        let b = graph.create_project(named("B"), clock.now());
        let child = graph.create_project(
            ProjectDraft {
                parent_id: Some(a),
                ..named("Child")
            },
            clock.now(),
        );

        let mut draft = graph.projects[&child].to_draft();
        draft.parent_id = Some(b);
        let old = graph.update_project(child, draft, clock.now()).unwrap();

        assert_eq!(old.parent_id, Some(a));
        assert!(graph.projects[&a].child_projects.is_empty());
        assert_eq!(graph.projects[&b].child_projects, vec![child]);
    }

    #[test]
    fn test_update_project_rejects_cycle() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let parent = graph.create_project(named("Parent"), clock.now());
        let child = graph.create_project(
            ProjectDraft {
                parent_id: Some(parent),
                ..named("Child")
            },
            clock.now(),
        );

        let mut draft = graph.projects[&parent].to_draft();
        draft.parent_id = Some(child);
        graph.update_project(parent, draft, clock.now());

        assert_eq!(graph.projects[&parent].parent_id, None);
        assert!(graph.projects[&child].child_projects.is_empty());
    }

    #[test]
    fn test_delete_project_removes_descendants() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let root = graph.create_project(named("Root"), clock.now());
        let mid = graph.create_project(
            ProjectDraft {
                parent_id: Some(root),
                ..named("Mid")
            },
            clock.now(),
        );
        graph.create_project(
            ProjectDraft {
                parent_id: Some(mid),
                ..named("Leaf")
            },
            clock.now(),
        );
        let other = graph.create_project(named("Other"), clock.now());

        let deleted = graph.delete_project(root).unwrap();
        assert_eq!(deleted.name, "Root");
        assert_eq!(graph.projects.len(), 1);
        assert!(graph.projects.contains_key(&other));
    }

    #[test]
    fn test_delete_child_unlinks_from_parent() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let parent = graph.create_project(named("Parent"), clock.now());
        let child = graph.create_project(
            ProjectDraft {
                parent_id: Some(parent),
                ..named("Child")
            },
            clock.now(),
        );
        graph.delete_project(child);
        assert!(graph.projects[&parent].child_projects.is_empty());
    }

    #[test]
    fn test_reorder_task_bounds() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let first = graph.add_task(p, task("first"), clock.now()).unwrap();
        let second = graph.add_task(p, task("second"), clock.now()).unwrap();

        assert!(!graph.reorder_task(p, first, -1, clock.now()));
        assert!(graph.reorder_task(p, first, 1, clock.now()));
        let order: Vec<Uuid> = graph.projects[&p].tasks.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![second, first]);
        assert!(!graph.reorder_task(p, first, 1, clock.now()));
    }

    #[test]
    fn test_reorder_project_within_theme() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let a = graph.create_project(named("A"), clock.now());
        clock.advance_secs(1);
        let b = graph.create_project(named("B"), clock.now());
        clock.advance_secs(1);
        let c = graph.create_project(named("C"), clock.now());
        let other = graph.create_project(
            ProjectDraft {
                theme: "Health".to_string(),
                ..named("Run")
            },
            clock.now(),
        );

        assert!(graph.reorder_project(c, -1, clock.now()));
        let ids = |graph: &TaskGraph| -> Vec<Uuid> {
            graph.projects_by_theme()[0].1.iter().map(|p| p.id).collect()
        };
        assert_eq!(ids(&graph), vec![a, c, b]);

        assert!(!graph.reorder_project(a, -1, clock.now()));
        assert!(!graph.reorder_project(other, 1, clock.now()));
        assert_eq!(graph.projects[&a].order, 1000);
    }

    #[test]
    fn test_reorder_child_project_among_siblings() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let parent = graph.create_project(named("Home"), clock.now());
        let mut children = Vec::new();
        for name in ["Kitchen", "Garage"] {
            clock.advance_secs(1);
            children.push(graph.create_project(
                ProjectDraft {
                    parent_id: Some(parent),
                    ..named(name)
                },
                clock.now(),
            ));
        }

        assert!(graph.reorder_project(children[1], -1, clock.now()));
        let order: Vec<Uuid> = graph.children_of(parent).iter().map(|p| p.id).collect();
        assert_eq!(order, vec![children[1], children[0]]);
    }

    #[test]
    fn test_update_and_reorder_subtasks() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("Home"), clock.now());
        let t = graph.add_task(p, task("Paint"), clock.now()).unwrap();
        let first = graph
            .add_subtask(p, t, "Buy paint".to_string(), clock.now())
            .unwrap();
        let second = graph
            .add_subtask(p, t, "Tape edges".to_string(), clock.now())
            .unwrap();

        let old = graph
            .update_subtask(p, t, first, "Buy white paint".to_string(), clock.now())
            .unwrap();
        assert_eq!(old.description, "Buy paint");

        assert!(graph.reorder_subtask(p, t, second, -1, clock.now()));
        let descriptions: Vec<&str> = graph
            .task(p, t)
            .unwrap()
            .subtasks
            .iter()
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Tape edges", "Buy white paint"]);
        assert!(!graph.reorder_subtask(p, t, second, -1, clock.now()));
        assert!(graph
            .update_subtask(p, t, Uuid::new_v4(), "x".to_string(), clock.now())
            .is_none());
    }

    #[test]
    fn test_move_subtask_between_tasks() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("Home"), clock.now());
        let paint = graph.add_task(p, task("Paint"), clock.now()).unwrap();
        let clean = graph.add_task(p, task("Clean"), clock.now()).unwrap();
        let s = graph
            .add_subtask(p, paint, "Wash brushes".to_string(), clock.now())
            .unwrap();

        assert!(!graph.move_subtask_to_task(p, paint, s, paint, clock.now()));
        assert!(!graph.move_subtask_to_task(p, paint, s, Uuid::new_v4(), clock.now()));
        assert!(graph.move_subtask_to_task(p, paint, s, clean, clock.now()));

        assert!(graph.task(p, paint).unwrap().subtasks.is_empty());
        assert_eq!(graph.task(p, clean).unwrap().subtasks[0].id, s);
    }

    #[test]
    fn test_move_task_updates_goal_links() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let a = graph.create_project(named("A"), clock.now());
        let b = graph.create_project(named("B"), clock.now());
        let t = graph.add_task(a, task("travel"), clock.now()).unwrap();
        let goal = graph.create_goal(
            GoalDraft {
                title: "Goal".to_string(),
                linked_tasks: vec![TaskLink {
                    project_id: a,
                    task_id: t,
                }],
                ..Default::default()
            },
            clock.now(),
        );

        assert!(graph.move_task_to_project(a, t, b, clock.now()));
        assert!(graph.projects[&a].tasks.is_empty());
        assert_eq!(graph.projects[&b].tasks[0].id, t);
        assert_eq!(graph.goals[&goal].linked_tasks[0].project_id, b);
        assert!(!graph.move_task_to_project(b, t, b, clock.now()));
    }

    #[test]
    fn test_log_time_requires_task_and_project() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let t = graph.add_task(p, task("t"), clock.now()).unwrap();

        assert!(graph.log_time(p, t, 0.5));
        assert!(!graph.log_time(p, Uuid::new_v4(), 0.5));
        assert!(!graph.log_time(Uuid::new_v4(), t, 0.5));
        assert_eq!(graph.projects[&p].actual_time, 0.5);
        assert_eq!(graph.projects[&p].tasks[0].actual_time, 0.5);
    }

    #[test]
    fn test_archive_completed_tasks() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let done = graph.add_task(p, task("done"), clock.now()).unwrap();
        graph.add_task(p, task("open"), clock.now()).unwrap();
        graph.toggle_task(p, done, clock.now());

        assert_eq!(graph.archive_completed_tasks(p, clock.now()), 1);
        assert_eq!(graph.projects[&p].tasks.len(), 1);
        assert_eq!(graph.archived_tasks[&p][0].id, done);
        assert_eq!(graph.archive_completed_tasks(p, clock.now()), 0);
    }

    #[test]
    fn test_archive_and_restore_project_round_trip() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        graph.add_task(p, task("a"), clock.now());
        graph.add_task(p, task("b"), clock.now());

        assert!(graph.archive_project(p, clock.now()));
        assert!(graph.projects.is_empty());
        assert!(graph.archived_projects[&p].archived_at.is_some());
        assert_eq!(graph.archived_tasks[&p].len(), 2);

        assert!(graph.restore_project(p, clock.now()));
        assert_eq!(graph.projects[&p].tasks.len(), 2);
        assert!(graph.archived_tasks.get(&p).is_none());
        assert_eq!(graph.projects[&p].archived_at, None);
    }

    #[test]
    fn test_restore_task_revives_archived_project() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let t = graph.add_task(p, task("a"), clock.now()).unwrap();
        graph.toggle_task(p, t, clock.now());
        graph.archive_project(p, clock.now());

        assert!(graph.restore_task(p, t, clock.now()));
        let restored = &graph.projects[&p].tasks[0];
        assert!(!restored.completed);
        assert_eq!(restored.completed_at, None);
        assert!(graph.archived_projects.is_empty());
    }

    #[test]
    fn test_goal_progress_counts_dangling_links_as_open() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let t = graph.add_task(p, task("a"), clock.now()).unwrap();
        graph.toggle_task(p, t, clock.now());
        let goal_id = graph.create_goal(
            GoalDraft {
                title: "G".to_string(),
                linked_tasks: vec![
                    TaskLink {
                        project_id: p,
                        task_id: t,
                    },
                    TaskLink {
                        project_id: p,
                        task_id: Uuid::new_v4(),
                    },
                ],
                ..Default::default()
            },
            clock.now(),
        );

        let progress = graph.goal_progress(&graph.goals[&goal_id]);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.percentage, 50.0);
    }

    #[test]
    fn test_planned_flags() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let t = graph.add_task(p, task("a"), clock.now()).unwrap();

        let marked = graph.mark_planned(&[
            TaskLink {
                project_id: p,
                task_id: t,
            },
            TaskLink {
                project_id: p,
                task_id: Uuid::new_v4(),
            },
        ]);
        assert_eq!(marked, 1);
        assert_eq!(graph.planned_tasks().len(), 1);

        graph.clear_planned_flags();
        assert!(graph.planned_tasks().is_empty());
    }

    #[test]
    fn test_stats_count_archive_as_done() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let t = graph.add_task(p, task("a"), clock.now()).unwrap();
        graph.add_task(p, task("b"), clock.now());
        graph.toggle_task(p, t, clock.now());
        graph.archive_completed_tasks(p, clock.now());

        let stats = graph.stats();
        assert_eq!(stats.total_projects, 1);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.completion_rate(), 50);
        // Archiving does not undo today's completion
        assert_eq!(graph.tasks_completed_on(clock.today()), 1);
    }

    #[test]
    fn test_graph_serde_round_trip_preserves_equality() {
        let clock = clock();
        let mut graph = TaskGraph::default();
        let p = graph.create_project(named("P"), clock.now());
        let t = graph.add_task(p, task("a"), clock.now()).unwrap();
        graph.add_subtask(p, t, "step".to_string(), clock.now());

        let json = serde_json::to_string(&graph).unwrap();
        let back: TaskGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
    }
}
