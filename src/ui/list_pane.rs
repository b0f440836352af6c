use crate::app::AppState;
use crate::domain::{
    checkbox, format_hours, tree_connector, FlatRow, Project, RowTarget, Task, TaskGraph, View,
};
use crate::ui::styles::{
    border_style, default_style, done_style, overdue_style, priority_style, selected_style,
    theme_style, title_style, tree_style,
};
use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use uuid::Uuid;

/// Live or archived project
pub fn lookup_project(graph: &TaskGraph, project_id: Uuid) -> Option<&Project> {
    graph
        .project(project_id)
        .or_else(|| graph.archived_projects.get(&project_id))
}

/// Live or archived task
pub fn lookup_task(graph: &TaskGraph, project_id: Uuid, task_id: Uuid) -> Option<&Task> {
    graph.task(project_id, task_id).or_else(|| {
        graph
            .archived_tasks
            .get(&project_id)?
            .iter()
            .find(|t| t.id == task_id)
    })
}

fn empty_hint(view: View) -> &'static str {
    match view {
        View::Projects | View::Board => "No projects yet. Press P to add one.",
        View::Focus => "Nothing planned for today. Press D to plan your day.",
        View::Goals => "No goals yet. Press g to add one.",
        View::Archive => "The archive is empty.",
    }
}

/// Render the list pane for the current view
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let rows = app.visible_rows();
    let today = app.today();

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Line::raw(empty_hint(app.view))).style(default_style())]
    } else {
        rows.iter()
            .map(|row| {
                let line = create_row_line(&app.graph, row, today);
                let style = if row.index == app.selected_index {
                    selected_style()
                } else {
                    default_style()
                };
                ListItem::new(line).style(style)
            })
            .collect()
    };

    let date = today.format("%a %b %d");
    let title = match app.view {
        View::Board => format!(" Board: {} ({}) ", app.board_column.label(), date),
        view => format!(" {} ({}) ", view.title(), date),
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    // Keep the selection scrolled into view
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Create a single line for a row
/// Format: ├─ [ ] Write proposal  1h 30m/2h  due 2026-05-01 ★
fn create_row_line(graph: &TaskGraph, row: &FlatRow, today: NaiveDate) -> Line<'static> {
    let mut spans = Vec::new();

    if row.depth > 0 {
        spans.push(Span::styled("   ".repeat(row.depth - 1), tree_style()));
        spans.push(Span::styled(
            format!("{} ", tree_connector(row.is_last)),
            tree_style(),
        ));
    }

    match row.target {
        RowTarget::Theme => {
            spans.push(Span::styled(row.label.clone(), theme_style()));
        }
        RowTarget::Project { project_id } => {
            spans.push(Span::raw(row.label.clone()));
            if let Some(project) = lookup_project(graph, project_id) {
                spans.push(Span::styled(
                    format!("  [{}]", project.priority.label()),
                    priority_style(project.priority),
                ));
                let (done, total) = project.progress();
                if total > 0 {
                    spans.push(Span::raw(format!("  {}/{}", done, total)));
                }
                if let Some(due) = project.due_date {
                    spans.push(Span::raw(format!("  due {}", due)));
                }
            }
        }
        RowTarget::Task {
            project_id,
            task_id,
        } => match lookup_task(graph, project_id, task_id) {
            Some(task) => push_task_spans(&mut spans, task, &row.label, today),
            None => spans.push(Span::raw(row.label.clone())),
        },
        RowTarget::Subtask {
            project_id,
            task_id,
            subtask_id,
        } => {
            let completed = lookup_task(graph, project_id, task_id)
                .and_then(|t| t.subtasks.iter().find(|s| s.id == subtask_id))
                .map(|s| s.completed)
                .unwrap_or(false);
            let style = if completed { done_style() } else { default_style() };
            spans.push(Span::styled(
                format!("{} {}", checkbox(completed), row.label),
                style,
            ));
        }
        RowTarget::Goal { goal_id } => {
            spans.push(Span::styled(row.label.clone(), theme_style()));
            if let Some(goal) = graph.goals.get(&goal_id) {
                let progress = graph.goal_progress(goal);
                spans.push(Span::raw(format!(
                    "  {}/{} ({:.0}%)",
                    progress.completed, progress.total, progress.percentage
                )));
                if let Some(label) = goal.due_label(today) {
                    spans.push(Span::raw(format!("  {}", label)));
                }
            }
        }
    }

    Line::from(spans)
}

fn push_task_spans(spans: &mut Vec<Span<'static>>, task: &Task, label: &str, today: NaiveDate) {
    let style = if task.completed {
        done_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(
        format!("{} {}", checkbox(task.completed), label),
        style,
    ));

    if task.estimated_time > 0.0 || task.actual_time > 0.0 {
        spans.push(Span::raw(format!(
            "  {}/{}",
            format_hours(task.actual_time),
            format_hours(task.estimated_time)
        )));
    }

    if let Some(due) = task.due_date {
        let due_style = if task.is_overdue(today) {
            overdue_style()
        } else {
            default_style()
        };
        spans.push(Span::styled(format!("  due {}", due), due_style));
    }

    let (done, total) = task.subtask_progress();
    if total > 0 {
        spans.push(Span::raw(format!("  ({}/{})", done, total)));
    }

    if task.planned_for_today {
        spans.push(Span::raw(" ★".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::domain::{flatten_projects, ProjectDraft, TaskDraft};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let clock = ManualClock::at(2026, 5, 8, 9, 0, 0);
        let mut graph = TaskGraph::default();
        let p = graph.create_project(
            ProjectDraft {
                name: "Site".to_string(),
                ..Default::default()
            },
            clock.now(),
        );
        graph.add_task(
            p,
            TaskDraft {
                description: "Write copy".to_string(),
                estimated_time: 2.0,
                due_date: clock.today().pred_opt(),
                ..Default::default()
            },
            clock.now(),
        );

        let rows = flatten_projects(&graph);
        let project_line = line_text(&create_row_line(&graph, &rows[1], clock.today()));
        assert!(project_line.contains("Site  [medium]  0/1"));

        let task_line = line_text(&create_row_line(&graph, &rows[2], clock.today()));
        assert!(task_line.starts_with("└─ [ ] Write copy"));
        assert!(task_line.contains("0m/2h"));
        assert!(task_line.contains("due 2026-05-07"));
    }

    #[test]
    fn test_lookup_finds_archived_tasks() {
        let clock = ManualClock::at(2026, 5, 8, 9, 0, 0);
        let mut graph = TaskGraph::default();
        let p = graph.create_project(ProjectDraft::default(), clock.now());
        let t = graph
            .add_task(
                p,
                TaskDraft {
                    description: "done".to_string(),
                    ..Default::default()
                },
                clock.now(),
            )
            .unwrap();
        graph.toggle_task(p, t, clock.now());
        graph.archive_completed_tasks(p, clock.now());

        assert!(graph.task(p, t).is_none());
        assert!(lookup_task(&graph, p, t).is_some());
    }
}
