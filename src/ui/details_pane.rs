use crate::app::AppState;
use crate::domain::{format_hours, RowTarget, TaskGraph, TaskLink};
use crate::ui::list_pane::{lookup_project, lookup_task};
use crate::ui::styles::{border_style, default_style, overdue_style, title_style};
use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, title_style()),
        Span::raw(value),
    ])
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render the details pane for the selected row
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let lines = match app.selected_target() {
        Some(target) => detail_lines(&app.graph, target, app.today()),
        None => vec![Line::styled("Nothing selected", default_style())],
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn detail_lines(graph: &TaskGraph, target: RowTarget, today: NaiveDate) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match target {
        RowTarget::Theme => {
            lines.push(Line::raw("Aspect header"));
            lines.push(Line::raw(""));
            lines.push(Line::raw("Press P to add a project."));
        }
        RowTarget::Project { project_id } => {
            let Some(project) = lookup_project(graph, project_id) else {
                return lines;
            };
            lines.push(field("Project: ", project.name.clone()));
            lines.push(Line::raw(""));
            let theme = if project.theme.is_empty() {
                "General".to_string()
            } else {
                project.theme.clone()
            };
            lines.push(field("Aspect:   ", theme));
            lines.push(field("Board:    ", project.status.label().to_string()));
            lines.push(field("Priority: ", project.priority.label().to_string()));
            lines.push(field("Due:      ", date_or_dash(project.due_date)));
            lines.push(field(
                "Time:     ",
                format!(
                    "{} logged / {} estimated",
                    format_hours(project.actual_time),
                    format_hours(project.estimated_time)
                ),
            ));
            let (done, total) = project.progress();
            lines.push(field("Tasks:    ", format!("{}/{} done", done, total)));
            if let Some(parent) = project.parent_id.and_then(|id| graph.project_name(id)) {
                lines.push(field("Parent:   ", parent.to_string()));
            }
            if !project.child_projects.is_empty() {
                lines.push(field(
                    "Children: ",
                    project.child_projects.len().to_string(),
                ));
            }
            if project.archived_at.is_some() {
                lines.push(field("Archived: ", "yes".to_string()));
            }
            if !project.description.trim().is_empty() {
                lines.push(Line::raw(""));
                for text in project.description.lines() {
                    lines.push(Line::raw(text.to_string()));
                }
            }
        }
        RowTarget::Task {
            project_id,
            task_id,
        } => {
            let Some(task) = lookup_task(graph, project_id, task_id) else {
                return lines;
            };
            lines.push(field("Task: ", task.description.clone()));
            lines.push(Line::raw(""));
            lines.push(field(
                "Project:  ",
                graph.project_name(project_id).unwrap_or("-").to_string(),
            ));

            let priority = match task.priority {
                Some(p) => p.label().to_string(),
                None => lookup_project(graph, project_id)
                    .map(|p| format!("{} (project)", p.priority.label()))
                    .unwrap_or_else(|| "-".to_string()),
            };
            lines.push(field("Priority: ", priority));

            let due = date_or_dash(task.due_date);
            if task.is_overdue(today) {
                lines.push(Line::from(vec![
                    Span::styled("Due:      ", title_style()),
                    Span::styled(format!("{} (overdue)", due), overdue_style()),
                ]));
            } else {
                lines.push(field("Due:      ", due));
            }
            lines.push(field(
                "Time:     ",
                format!(
                    "{} logged / {} estimated",
                    format_hours(task.actual_time),
                    format_hours(task.estimated_time)
                ),
            ));

            let status = match task.completed_at {
                Some(at) if task.completed => format!("done {}", at.format("%Y-%m-%d %H:%M")),
                _ => "open".to_string(),
            };
            lines.push(field("Status:   ", status));
            if task.planned_for_today {
                lines.push(field("Planned:  ", "today".to_string()));
            }
            let (done, total) = task.subtask_progress();
            if total > 0 {
                lines.push(field("Subtasks: ", format!("{}/{} done", done, total)));
            }

            let link = TaskLink {
                project_id,
                task_id,
            };
            let goals: Vec<String> = graph
                .goals
                .values()
                .filter(|g| g.linked_tasks.contains(&link))
                .map(|g| g.title.clone())
                .collect();
            if !goals.is_empty() {
                lines.push(field("Goals:    ", goals.join(", ")));
            }
        }
        RowTarget::Subtask {
            project_id,
            task_id,
            subtask_id,
        } => {
            let Some(task) = lookup_task(graph, project_id, task_id) else {
                return lines;
            };
            if let Some(subtask) = task.subtasks.iter().find(|s| s.id == subtask_id) {
                lines.push(field("Subtask: ", subtask.description.clone()));
                lines.push(Line::raw(""));
                lines.push(field("Task:    ", task.description.clone()));
                let status = if subtask.completed { "done" } else { "open" };
                lines.push(field("Status:  ", status.to_string()));
            }
        }
        RowTarget::Goal { goal_id } => {
            let Some(goal) = graph.goals.get(&goal_id) else {
                return lines;
            };
            let progress = graph.goal_progress(goal);
            lines.push(field("Goal: ", goal.title.clone()));
            lines.push(Line::raw(""));
            lines.push(field(
                "Progress: ",
                format!(
                    "{}/{} tasks ({:.1}%)",
                    progress.completed, progress.total, progress.percentage
                ),
            ));
            lines.push(field(
                "Due:      ",
                goal.due_label(today).unwrap_or_else(|| "-".to_string()),
            ));
            if !goal.description.trim().is_empty() {
                lines.push(Line::raw(""));
                for text in goal.description.lines() {
                    lines.push(Line::raw(text.to_string()));
                }
            }
        }
    }

    lines
}
