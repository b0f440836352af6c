use crate::domain::{Task, TaskGraph};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day's productivity counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayProductivity {
    /// Hours logged
    pub time_logged: f64,
    pub tasks_completed: u32,
    pub focus_sessions: u32,
    pub pomodoro_sessions: u32,
}

/// Persisted per-day history used by the reports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsData {
    pub daily_productivity: BTreeMap<NaiveDate, DayProductivity>,
    /// Projects moved into incubation per day
    pub incubation_activity: BTreeMap<NaiveDate, u32>,
    pub last_updated: Option<DateTime<Local>>,
}

impl AnalyticsData {
    /// Overwrite the counters for `now`'s date
    pub fn record_day(&mut self, now: DateTime<Local>, day: DayProductivity) {
        self.daily_productivity.insert(now.date_naive(), day);
        self.last_updated = Some(now);
    }

    /// Count one project moved into incubation today
    pub fn track_incubation(&mut self, now: DateTime<Local>) {
        *self.incubation_activity.entry(now.date_naive()).or_insert(0) += 1;
        self.last_updated = Some(now);
    }

    pub fn day(&self, date: NaiveDate) -> DayProductivity {
        self.daily_productivity.get(&date).copied().unwrap_or_default()
    }
}

/// Totals for a single day inside a period
#[derive(Debug, Clone, PartialEq)]
pub struct DayStats {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub tasks: u32,
    pub time: f64,
    pub focus_sessions: u32,
}

/// Seven days ending at a date
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_tasks: u32,
    pub total_time: f64,
    pub total_focus_sessions: u32,
    pub average_tasks_per_day: f64,
    pub average_time_per_day: f64,
    pub days: Vec<DayStats>,
}

/// A Sunday-to-Saturday slice of a month
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSlice {
    pub week_number: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_tasks: u32,
    pub total_time: f64,
}

/// A calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub total_tasks: u32,
    pub total_time: f64,
    pub total_focus_sessions: u32,
    pub average_tasks_per_day: f64,
    pub average_time_per_day: f64,
    pub weeks: Vec<WeekSlice>,
}

/// Direction of recent output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Steady,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Declining => "Declining",
            Self::Steady => "Steady",
        }
    }
}

/// Highlights over the last seven days that have data
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub most_productive: (Weekday, u32),
    pub hours_per_task: f64,
    pub tasks_per_focus_session: f64,
    pub trend: Trend,
}

/// Estimated vs actual hours over finished tasks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimationStats {
    pub over_estimate_count: usize,
    pub over_estimate_hours: f64,
    pub under_estimate_count: usize,
    pub under_estimate_hours: f64,
    pub perfect_count: usize,
    pub avg_accuracy_percent: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn day_stats(analytics: &AnalyticsData, date: NaiveDate) -> DayStats {
    let day = analytics.day(date);
    DayStats {
        date,
        weekday: date.weekday(),
        tasks: day.tasks_completed,
        time: day.time_logged,
        focus_sessions: day.focus_sessions,
    }
}

/// Calculate the seven days ending at `end` (inclusive)
pub fn weekly_stats(analytics: &AnalyticsData, end: NaiveDate) -> WeeklyStats {
    let start = end - Duration::days(6);
    let days: Vec<DayStats> = start
        .iter_days()
        .take(7)
        .map(|d| day_stats(analytics, d))
        .collect();

    let total_tasks: u32 = days.iter().map(|d| d.tasks).sum();
    let total_time: f64 = days.iter().map(|d| d.time).sum();
    let total_focus_sessions: u32 = days.iter().map(|d| d.focus_sessions).sum();

    WeeklyStats {
        start,
        end,
        total_tasks,
        total_time: round2(total_time),
        total_focus_sessions,
        average_tasks_per_day: total_tasks as f64 / 7.0,
        average_time_per_day: total_time / 7.0,
        days,
    }
}

/// Calculate a calendar month, split into Sunday-to-Saturday weeks
pub fn monthly_stats(analytics: &AnalyticsData, year: i32, month: u32) -> Option<MonthlyStats> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month.pred_opt()?;

    let days: Vec<DayStats> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| day_stats(analytics, d))
        .collect();

    let mut weeks = Vec::new();
    let mut current: Vec<&DayStats> = Vec::new();
    for day in &days {
        current.push(day);
        if day.weekday == Weekday::Sat || day.date == last {
            weeks.push(WeekSlice {
                week_number: weeks.len() + 1,
                start: current[0].date,
                end: day.date,
                total_tasks: current.iter().map(|d| d.tasks).sum(),
                total_time: round2(current.iter().map(|d| d.time).sum()),
            });
            current.clear();
        }
    }

    let days_in_month = days.len() as u32;
    let total_tasks: u32 = days.iter().map(|d| d.tasks).sum();
    let total_time: f64 = days.iter().map(|d| d.time).sum();

    Some(MonthlyStats {
        year,
        month,
        days_in_month,
        total_tasks,
        total_time: round2(total_time),
        total_focus_sessions: days.iter().map(|d| d.focus_sessions).sum(),
        average_tasks_per_day: total_tasks as f64 / days_in_month as f64,
        average_time_per_day: total_time / days_in_month as f64,
        weeks,
    })
}

/// The last `weeks` Sunday-to-Saturday weeks up to the one holding `today`, oldest first
pub fn weekly_series(analytics: &AnalyticsData, today: NaiveDate, weeks: u32) -> Vec<WeeklyStats> {
    let saturday = today + Duration::days(6 - i64::from(today.weekday().num_days_from_sunday()));
    (0..i64::from(weeks))
        .rev()
        .map(|back| weekly_stats(analytics, saturday - Duration::weeks(back)))
        .collect()
}

/// The last `months` calendar months up to the one holding `today`, oldest first
pub fn monthly_series(analytics: &AnalyticsData, today: NaiveDate, months: u32) -> Vec<MonthlyStats> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..months as i32)
        .rev()
        .filter_map(|back| {
            let index = current - back;
            monthly_stats(analytics, index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// Calculate insights over the seven days ending at `end`. None when no day has data.
pub fn insights(analytics: &AnalyticsData, end: NaiveDate) -> Option<Insights> {
    let start = end - Duration::days(6);
    let days: Vec<(NaiveDate, DayProductivity)> = analytics
        .daily_productivity
        .range(start..=end)
        .map(|(d, p)| (*d, *p))
        .collect();

    let (first_date, first_day) = days.first()?;
    let mut most_productive = (first_date.weekday(), first_day.tasks_completed);
    for (date, day) in &days {
        if day.tasks_completed > most_productive.1 {
            most_productive = (date.weekday(), day.tasks_completed);
        }
    }

    let total_time: f64 = days.iter().map(|(_, d)| d.time_logged).sum();
    let total_tasks: u32 = days.iter().map(|(_, d)| d.tasks_completed).sum();
    let total_sessions: u32 = days.iter().map(|(_, d)| d.focus_sessions).sum();

    let hours_per_task = if total_tasks > 0 {
        total_time / total_tasks as f64
    } else {
        0.0
    };
    let tasks_per_focus_session = if total_sessions > 0 {
        total_tasks as f64 / total_sessions as f64
    } else {
        0.0
    };

    let half = days.len() / 2;
    let average = |slice: &[(NaiveDate, DayProductivity)]| -> Option<f64> {
        if slice.is_empty() {
            return None;
        }
        let sum: u32 = slice.iter().map(|(_, d)| d.tasks_completed).sum();
        Some(sum as f64 / slice.len() as f64)
    };
    let trend = match (average(&days[..half]), average(&days[half..])) {
        (Some(first), Some(second)) if second > first => Trend::Improving,
        (Some(first), Some(second)) if second < first => Trend::Declining,
        _ => Trend::Steady,
    };

    Some(Insights {
        most_productive,
        hours_per_task,
        tasks_per_focus_session,
        trend,
    })
}

/// Calculate estimation accuracy over tasks that have an estimate
pub fn estimation_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> EstimationStats {
    let mut stats = EstimationStats::default();
    let mut accuracy_sum = 0.0;
    let mut accuracy_count = 0;

    for task in tasks {
        if task.estimated_time <= 0.0 {
            continue;
        }
        let actual = task.actual_time;
        let estimate = task.estimated_time;

        if actual > estimate {
            stats.over_estimate_count += 1;
            stats.over_estimate_hours += actual - estimate;
        } else if actual < estimate {
            stats.under_estimate_count += 1;
            stats.under_estimate_hours += estimate - actual;
        } else {
            stats.perfect_count += 1;
        }

        // 100% = perfect estimate; overruns are penalized symmetrically
        let ratio = actual / estimate;
        let accuracy = if ratio > 1.0 { 100.0 / ratio } else { ratio * 100.0 };
        accuracy_sum += accuracy;
        accuracy_count += 1;
    }

    if accuracy_count > 0 {
        stats.avg_accuracy_percent = accuracy_sum / accuracy_count as f64;
    }
    stats
}

/// Completed tasks, live and archived
pub fn finished_tasks(graph: &TaskGraph) -> Vec<&Task> {
    graph
        .projects
        .values()
        .flat_map(|p| p.tasks.iter())
        .filter(|t| t.completed)
        .chain(graph.archived_tasks.values().flatten())
        .collect()
}
