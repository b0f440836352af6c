use super::enums::BoardStatus;
use super::graph::TaskGraph;
use super::project::Project;
use uuid::Uuid;

/// What a row in the project tree points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    /// Aspect header; carries no ids
    Theme,
    Project { project_id: Uuid },
    Task { project_id: Uuid, task_id: Uuid },
    Subtask { project_id: Uuid, task_id: Uuid, subtask_id: Uuid },
    Goal { goal_id: Uuid },
}

impl RowTarget {
    pub fn project_id(&self) -> Option<Uuid> {
        match *self {
            Self::Theme | Self::Goal { .. } => None,
            Self::Project { project_id }
            | Self::Task { project_id, .. }
            | Self::Subtask { project_id, .. } => Some(project_id),
        }
    }

    pub fn task_id(&self) -> Option<Uuid> {
        match *self {
            Self::Task { task_id, .. } | Self::Subtask { task_id, .. } => Some(task_id),
            _ => None,
        }
    }
}

/// A flattened row for rendering the project tree
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    /// Index in the flattened list
    pub index: usize,
    /// Indentation depth
    pub depth: usize,
    /// Whether this is the last sibling at its depth
    pub is_last: bool,
    pub target: RowTarget,
    pub label: String,
}

/// Flatten projects grouped by aspect into rows: theme header, project,
/// its tasks and subtasks, then its child projects one level deeper
pub fn flatten_projects(graph: &TaskGraph) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    for (theme, projects) in graph.projects_by_theme() {
        let label = if theme.is_empty() {
            "General".to_string()
        } else {
            theme
        };
        push_row(&mut rows, 0, false, RowTarget::Theme, label);

        let count = projects.len();
        for (i, project) in projects.into_iter().enumerate() {
            flatten_project(graph, project, 0, i + 1 == count, &mut rows);
        }
    }

    rows
}

fn flatten_project(graph: &TaskGraph, project: &Project, depth: usize, is_last: bool, rows: &mut Vec<FlatRow>) {
    push_row(
        rows,
        depth,
        is_last,
        RowTarget::Project {
            project_id: project.id,
        },
        project.name.clone(),
    );

    let task_count = project.tasks.len();
    for (t_idx, task) in project.tasks.iter().enumerate() {
        push_row(
            rows,
            depth + 1,
            t_idx + 1 == task_count,
            RowTarget::Task {
                project_id: project.id,
                task_id: task.id,
            },
            task.description.clone(),
        );

        let sub_count = task.subtasks.len();
        for (s_idx, subtask) in task.subtasks.iter().enumerate() {
            push_row(
                rows,
                depth + 2,
                s_idx + 1 == sub_count,
                RowTarget::Subtask {
                    project_id: project.id,
                    task_id: task.id,
                    subtask_id: subtask.id,
                },
                subtask.description.clone(),
            );
        }
    }

    let children = graph.children_of(project.id);
    let child_count = children.len();
    for (c_idx, child) in children.into_iter().enumerate() {
        // Guard against a corrupted parent chain pointing back up
        if graph.is_descendant_of(child.id, project.id) {
            continue;
        }
        flatten_project(graph, child, depth + 1, c_idx + 1 == child_count, rows);
    }
}

fn push_row(rows: &mut Vec<FlatRow>, depth: usize, is_last: bool, target: RowTarget, label: String) {
    let index = rows.len();
    rows.push(FlatRow {
        index,
        depth,
        is_last,
        target,
        label,
    });
}

/// Flatten one board into task rows (projects as headers)
pub fn flatten_board(graph: &TaskGraph, status: BoardStatus) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for project in graph.projects_on_board(status) {
        push_row(
            &mut rows,
            0,
            false,
            RowTarget::Project {
                project_id: project.id,
            },
            project.name.clone(),
        );
        let count = project.tasks.len();
        for (i, task) in project.tasks.iter().enumerate() {
            push_row(
                &mut rows,
                1,
                i + 1 == count,
                RowTarget::Task {
                    project_id: project.id,
                    task_id: task.id,
                },
                task.description.clone(),
            );
        }
    }
    rows
}

/// Tasks planned for today, labelled with their project
pub fn flatten_planned(graph: &TaskGraph) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    let planned = graph.planned_tasks();
    let count = planned.len();
    for (i, (project, task)) in planned.into_iter().enumerate() {
        push_row(
            &mut rows,
            0,
            i + 1 == count,
            RowTarget::Task {
                project_id: project.id,
                task_id: task.id,
            },
            format!("{} ({})", task.description, project.name),
        );
    }
    rows
}

/// Goals with their linked tasks underneath. Links to missing tasks are skipped.
pub fn flatten_goals(graph: &TaskGraph) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for goal in graph.goals.values() {
        push_row(
            &mut rows,
            0,
            false,
            RowTarget::Goal { goal_id: goal.id },
            goal.title.clone(),
        );

        let linked: Vec<_> = goal
            .linked_tasks
            .iter()
            .filter_map(|link| graph.task(link.project_id, link.task_id).map(|t| (link, t)))
            .collect();
        let count = linked.len();
        for (i, (link, task)) in linked.into_iter().enumerate() {
            push_row(
                &mut rows,
                1,
                i + 1 == count,
                RowTarget::Task {
                    project_id: link.project_id,
                    task_id: task.id,
                },
                task.description.clone(),
            );
        }
    }
    rows
}

/// Archived projects and archived tasks, grouped by owning project
pub fn flatten_archive(graph: &TaskGraph) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    let mut owners: Vec<Uuid> = graph.archived_projects.keys().copied().collect();
    for project_id in graph.archived_tasks.keys() {
        if !owners.contains(project_id) {
            owners.push(*project_id);
        }
    }

    for project_id in owners {
        let Some(name) = graph.project_name(project_id) else {
            continue;
        };
        let label = if graph.archived_projects.contains_key(&project_id) {
            format!("{} (archived)", name)
        } else {
            name.to_string()
        };
        push_row(&mut rows, 0, false, RowTarget::Project { project_id }, label);

        let tasks = graph
            .archived_tasks
            .get(&project_id)
            .map(|tasks| tasks.as_slice())
            .unwrap_or_default();
        let count = tasks.len();
        for (i, task) in tasks.iter().enumerate() {
            push_row(
                &mut rows,
                1,
                i + 1 == count,
                RowTarget::Task {
                    project_id,
                    task_id: task.id,
                },
                task.description.clone(),
            );
        }
    }
    rows
}

/// Format whole seconds as MM:SS, or H:MM:SS past an hour
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format fractional hours as "Xh Ym" (omits 0 values)
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;

    if h > 0 && m > 0 {
        format!("{}h {}m", h, m)
    } else if h > 0 {
        format!("{}h", h)
    } else {
        format!("{}m", m)
    }
}

/// Checkbox glyph for a completion flag
pub fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Get tree connector for nested rows
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}
