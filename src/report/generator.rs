use crate::domain::{format_clock, format_hours, TaskGraph};
use crate::persistence::{atomic_write, keys, load_or_default, KeyValueStore};
use crate::planner::DailyPlanning;
use crate::report::stats::{
    estimation_stats, finished_tasks, insights, monthly_series, monthly_stats, weekly_series,
    weekly_stats, AnalyticsData,
};
use crate::timer::{DailyStats, FocusSession};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Everything a report reads, loaded from the store
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub graph: TaskGraph,
    pub analytics: AnalyticsData,
    pub daily: DailyStats,
    pub focus: FocusSession,
    pub planning: DailyPlanning,
}

impl ReportInputs {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            graph: load_or_default(store, keys::GRAPH),
            analytics: load_or_default(store, keys::ANALYTICS),
            daily: load_or_default(store, keys::DAILY_STATS),
            focus: load_or_default(store, keys::FOCUS_SESSION),
            planning: load_or_default(store, keys::DAILY_PLANNING),
        }
    }
}

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Render the markdown report for `date`
pub fn render_report(inputs: &ReportInputs, date: NaiveDate) -> String {
    let mut report = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut report, inputs, date);
    report
}

fn write_report(out: &mut String, inputs: &ReportInputs, date: NaiveDate) -> std::fmt::Result {
    let graph = &inputs.graph;
    let analytics = &inputs.analytics;

    writeln!(out, "# Stride Report - {}\n", date)?;

    // Summary Section
    let totals = graph.stats();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Projects:** {}", totals.total_projects)?;
    writeln!(
        out,
        "- **Tasks Completed:** {}/{} ({}%)",
        totals.completed_tasks,
        totals.total_tasks,
        totals.completion_rate()
    )?;
    writeln!(out, "- **Streak:** {} days", inputs.daily.streak_days)?;
    writeln!(
        out,
        "- **Lifetime Focus:** {}\n",
        format_hours(inputs.focus.total_focus_time)
    )?;

    // Day Section
    let day = analytics.day(date);
    writeln!(out, "## Day\n")?;
    writeln!(out, "- **Tasks Completed:** {}", day.tasks_completed)?;
    writeln!(out, "- **Time Logged:** {}", format_hours(day.time_logged))?;
    writeln!(out, "- **Focus Sessions:** {}", day.focus_sessions)?;
    writeln!(out, "- **Pomodoro Rounds:** {}\n", day.pomodoro_sessions)?;

    // Week Section
    let week = weekly_stats(analytics, date);
    writeln!(out, "## Week ({} - {})\n", week.start, week.end)?;
    writeln!(
        out,
        "- **Total:** {} tasks, {}, {} focus sessions",
        week.total_tasks,
        format_hours(week.total_time),
        week.total_focus_sessions
    )?;
    writeln!(
        out,
        "- **Daily Average:** {:.1} tasks, {:.1}h\n",
        week.average_tasks_per_day, week.average_time_per_day
    )?;
    writeln!(out, "| Day | Date | Tasks | Time | Sessions |")?;
    writeln!(out, "|-----|------|-------|------|----------|")?;
    for d in &week.days {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            d.weekday,
            d.date,
            d.tasks,
            format_hours(d.time),
            d.focus_sessions
        )?;
    }
    writeln!(out)?;

    // Month Section
    if let Some(month) = monthly_stats(analytics, date.year(), date.month()) {
        writeln!(out, "## Month ({}-{:02})\n", month.year, month.month)?;
        writeln!(
            out,
            "- **Total:** {} tasks, {}, {} focus sessions",
            month.total_tasks,
            format_hours(month.total_time),
            month.total_focus_sessions
        )?;
        writeln!(
            out,
            "- **Daily Average:** {:.1} tasks, {:.1}h",
            month.average_tasks_per_day, month.average_time_per_day
        )?;
        for w in &month.weeks {
            writeln!(
                out,
                "- Week {} ({} - {}): {} tasks, {}",
                w.week_number,
                w.start,
                w.end,
                w.total_tasks,
                format_hours(w.total_time)
            )?;
        }
        writeln!(out)?;
    }

    // Insights Section
    writeln!(out, "## Insights\n")?;
    match insights(analytics, date) {
        Some(found) => {
            writeln!(
                out,
                "- **Most Productive Day:** {} ({} tasks)",
                found.most_productive.0, found.most_productive.1
            )?;
            writeln!(out, "- **Average Task Time:** {:.1}h per task", found.hours_per_task)?;
            writeln!(
                out,
                "- **Focus Efficiency:** {:.1} tasks/session",
                found.tasks_per_focus_session
            )?;
            writeln!(out, "- **Weekly Trend:** {}\n", found.trend.label())?;
        }
        None => writeln!(out, "No data yet\n")?,
    }

    // Estimation Accuracy Section
    let estimation = estimation_stats(finished_tasks(graph));
    writeln!(out, "## Estimation Accuracy\n")?;
    writeln!(
        out,
        "- **Tasks Over Estimate:** {} ({} over)",
        estimation.over_estimate_count,
        format_hours(estimation.over_estimate_hours)
    )?;
    writeln!(
        out,
        "- **Tasks Under Estimate:** {} ({} saved)",
        estimation.under_estimate_count,
        format_hours(estimation.under_estimate_hours)
    )?;
    writeln!(out, "- **Perfect Estimates:** {}", estimation.perfect_count)?;
    writeln!(
        out,
        "- **Average Accuracy:** {}\n",
        format_percent(estimation.avg_accuracy_percent)
    )?;

    // Goals Section
    if !graph.goals.is_empty() {
        writeln!(out, "## Goals\n")?;
        for goal in graph.goals.values() {
            let progress = graph.goal_progress(goal);
            write!(
                out,
                "- **{}**: {}/{} tasks ({})",
                goal.title,
                progress.completed,
                progress.total,
                format_percent(progress.percentage)
            )?;
            if let Some(label) = goal.due_label(date) {
                write!(out, " - {}", label)?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    // Planned Tasks Section
    let planned = graph.planned_tasks();
    if inputs.planning.last_planning_date == Some(date) && !planned.is_empty() {
        writeln!(out, "## Planned Today\n")?;
        for (project, task) in planned {
            let mark = if task.completed { "x" } else { " " };
            writeln!(out, "- [{}] {} ({})", mark, task.description, project.name)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// One-screen summary of timer and streak state for `stride status`
pub fn render_status(inputs: &ReportInputs, now: DateTime<Local>) -> String {
    let today = now.date_naive();
    let focus = &inputs.focus;
    let mut lines = Vec::new();

    let focus_line = if focus.is_active {
        format!("Focus: running {}", format_clock(focus.total_secs(now)))
    } else if focus.is_paused {
        format!("Focus: paused at {}", format_clock(focus.paused_time))
    } else {
        "Focus: idle".to_string()
    };
    lines.push(focus_line);

    let sessions = if focus.last_session_date == Some(today) {
        focus.sessions_today
    } else {
        0
    };
    lines.push(format!("Focus sessions today: {}", sessions));
    lines.push(format!("Lifetime focus: {}", format_hours(focus.total_focus_time)));

    let daily = &inputs.daily;
    if daily.last_active_date == Some(today) {
        lines.push(format!(
            "Today: {} tasks completed, {} logged",
            daily.completed_today,
            format_hours(daily.total_time_today)
        ));
    } else {
        lines.push("Today: no activity yet".to_string());
    }
    lines.push(format!("Streak: {} days", daily.streak_days));

    let planned = inputs.graph.planned_tasks();
    if inputs.planning.last_planning_date == Some(today) && !planned.is_empty() {
        let done = planned.iter().filter(|(_, t)| t.completed).count();
        lines.push(format!("Planned today: {}/{} done", done, planned.len()));
    }

    lines.join("\n")
}

/// Render week-by-week and month-by-month totals, oldest first
pub fn render_trends(analytics: &AnalyticsData, today: NaiveDate, weeks: u32, months: u32) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_trends(&mut out, analytics, today, weeks, months);
    out
}

fn write_trends(
    out: &mut String,
    analytics: &AnalyticsData,
    today: NaiveDate,
    weeks: u32,
    months: u32,
) -> std::fmt::Result {
    writeln!(out, "# Stride Trends - {}\n", today)?;

    writeln!(out, "## Weekly\n")?;
    writeln!(out, "| Week | Tasks | Time | Sessions | Tasks/Day |")?;
    writeln!(out, "|------|-------|------|----------|-----------|")?;
    for week in weekly_series(analytics, today, weeks) {
        writeln!(
            out,
            "| {} - {} | {} | {} | {} | {:.1} |",
            week.start,
            week.end,
            week.total_tasks,
            format_hours(week.total_time),
            week.total_focus_sessions,
            week.average_tasks_per_day
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Monthly\n")?;
    writeln!(out, "| Month | Tasks | Time | Sessions | Tasks/Day |")?;
    writeln!(out, "|-------|-------|------|----------|-----------|")?;
    for month in monthly_series(analytics, today, months) {
        writeln!(
            out,
            "| {}-{:02} | {} | {} | {} | {:.1} |",
            month.year,
            month.month,
            month.total_tasks,
            format_hours(month.total_time),
            month.total_focus_sessions,
            month.average_tasks_per_day
        )?;
    }
    Ok(())
}

/// Write trends for the periods ending at `today` to `output_path`, or `<data dir>/trends-<date>.md`
pub fn generate_trends(
    store: &dyn KeyValueStore,
    data_dir: &Path,
    today: NaiveDate,
    weeks: u32,
    months: u32,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let analytics: AnalyticsData = load_or_default(store, keys::ANALYTICS);
    let trends = render_trends(&analytics, today, weeks, months);

    let output = output_path.unwrap_or_else(|| data_dir.join(format!("trends-{}.md", today)));
    atomic_write(&output, &trends)
        .with_context(|| format!("Failed to write trends: {}", output.display()))?;

    Ok(output)
}

/// Write the report for `date` to `output_path`, or `<data dir>/report-<date>.md`
pub fn generate_report(
    store: &dyn KeyValueStore,
    data_dir: &Path,
    date: NaiveDate,
    output_path: Option<PathBuf>,
) -> Result<PathBuf> {
    let inputs = ReportInputs::load(store);
    let report = render_report(&inputs, date);

    let output = output_path.unwrap_or_else(|| data_dir.join(format!("report-{}.md", date)));
    atomic_write(&output, &report)
        .with_context(|| format!("Failed to write report: {}", output.display()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::domain::{GoalDraft, ProjectDraft, TaskDraft, TaskLink};
    use crate::persistence::{save_json, FileStore};
    use crate::report::stats::DayProductivity;
    use tempfile::tempdir;

    fn sample_inputs(clock: &ManualClock) -> ReportInputs {
        let mut graph = TaskGraph::default();
        let p = graph.create_project(
            ProjectDraft {
                name: "Launch".to_string(),
                ..Default::default()
            },
            clock.now(),
        );
        let t = graph
            .add_task(
                p,
                TaskDraft {
                    description: "Press kit".to_string(),
                    estimated_time: 1.0,
                    ..Default::default()
                },
                clock.now(),
            )
            .unwrap();
        graph.toggle_task(p, t, clock.now());
        graph.create_goal(
            GoalDraft {
                title: "Ship it".to_string(),
                linked_tasks: vec![TaskLink {
                    project_id: p,
                    task_id: t,
                }],
                ..Default::default()
            },
            clock.now(),
        );

        let mut analytics = AnalyticsData::default();
        analytics.record_day(
            clock.now(),
            DayProductivity {
                time_logged: 1.5,
                tasks_completed: 1,
                focus_sessions: 2,
                pomodoro_sessions: 0,
            },
        );

        ReportInputs {
            graph,
            analytics,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_report_sections() {
        let clock = ManualClock::at(2026, 5, 8, 18, 0, 0);
        let report = render_report(&sample_inputs(&clock), clock.today());

        assert!(report.starts_with("# Stride Report - 2026-05-08"));
        assert!(report.contains("- **Tasks Completed:** 1/1 (100%)"));
        assert!(report.contains("- **Time Logged:** 1h 30m"));
        assert!(report.contains("## Week (2026-05-02 - 2026-05-08)"));
        assert!(report.contains("## Month (2026-05)"));
        assert!(report.contains("- **Most Productive Day:** Fri (1 tasks)"));
        assert!(report.contains("- **Ship it**: 1/1 tasks (100.0%)"));
    }

    #[test]
    fn test_render_report_without_data() {
        let clock = ManualClock::at(2026, 5, 8, 18, 0, 0);
        let report = render_report(&ReportInputs::default(), clock.today());
        assert!(report.contains("No data yet"));
        assert!(!report.contains("## Goals"));
    }

    #[test]
    fn test_render_status_for_running_focus() {
        let clock = ManualClock::at(2026, 5, 8, 18, 0, 0);
        let mut inputs = ReportInputs::default();
        inputs.focus.is_active = true;
        inputs.focus.start_time = Some(clock.now());
        inputs.focus.sessions_today = 2;
        inputs.focus.last_session_date = Some(clock.today());
        inputs.daily.streak_days = 4;
        clock.advance_secs(65);

        let status = render_status(&inputs, clock.now());
        let lines: Vec<&str> = status.lines().collect();
        assert_eq!(lines[0], "Focus: running 01:05");
        assert_eq!(lines[1], "Focus sessions today: 2");
        assert!(status.contains("Today: no activity yet"));
        assert!(status.contains("Streak: 4 days"));
    }

    #[test]
    fn test_generate_report_writes_default_path() {
        let clock = ManualClock::at(2026, 5, 8, 18, 0, 0);
        let temp_dir = tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        let inputs = sample_inputs(&clock);
        save_json(&store, keys::GRAPH, &inputs.graph).unwrap();
        save_json(&store, keys::ANALYTICS, &inputs.analytics).unwrap();

        let path = generate_report(&store, temp_dir.path(), clock.today(), None).unwrap();
        assert_eq!(path, temp_dir.path().join("report-2026-05-08.md"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("## Goals"));
    }

    #[test]
    fn test_render_trends_rows_oldest_first() {
        let clock = ManualClock::at(2026, 5, 8, 18, 0, 0);
        let inputs = sample_inputs(&clock);
        let trends = render_trends(&inputs.analytics, clock.today(), 2, 2);

        assert!(trends.starts_with("# Stride Trends - 2026-05-08"));
        let weekly = trends.find("| 2026-04-26 - 2026-05-02 | 0 |").unwrap();
        let current = trends.find("| 2026-05-03 - 2026-05-09 | 1 | 1h 30m | 2 | 0.1 |").unwrap();
        assert!(weekly < current);
        let april = trends.find("| 2026-04 | 0 |").unwrap();
        let may = trends.find("| 2026-05 | 1 | 1h 30m | 2 | 0.0 |").unwrap();
        assert!(april < may);
    }

    #[test]
    fn test_generate_trends_writes_default_path() {
        let clock = ManualClock::at(2026, 5, 8, 18, 0, 0);
        let temp_dir = tempdir().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        save_json(&store, keys::ANALYTICS, &sample_inputs(&clock).analytics).unwrap();

        let path = generate_trends(&store, temp_dir.path(), clock.today(), 4, 6, None).unwrap();
        assert_eq!(path, temp_dir.path().join("trends-2026-05-08.md"));
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.matches("| 2026-").count(), 10);
    }
}
