use crate::app::AppState;
use crate::domain::{format_clock, format_hours};
use crate::timer::{FocusSession, PomodoroSession};
use crate::ui::styles::{
    border_style, break_style, default_style, hint_style, idle_style, modal_title_style,
    paused_style, running_style,
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SEPARATOR: &str = "  │  ";

fn focus_span(focus: &FocusSession, now: DateTime<Local>) -> Span<'static> {
    if focus.is_active {
        Span::styled(
            format!("Focus {} ●", format_clock(focus.total_secs(now))),
            running_style(),
        )
    } else if focus.is_paused {
        Span::styled(
            format!("Focus {} paused", format_clock(focus.paused_time)),
            paused_style(),
        )
    } else {
        Span::styled("Focus idle".to_string(), idle_style())
    }
}

fn pomodoro_span(pomodoro: &PomodoroSession, paused: bool) -> Span<'static> {
    if !pomodoro.is_active {
        return Span::styled(
            format!("Pomodoro idle ({} rounds)", pomodoro.completed_rounds),
            idle_style(),
        );
    }

    let mut text = format!(
        "{} {} · round {}",
        pomodoro.current_phase.label(),
        format_clock(pomodoro.time_remaining),
        pomodoro.current_round
    );
    if paused {
        text.push_str(" paused");
        return Span::styled(text, paused_style());
    }
    let style = if pomodoro.current_phase.is_break() {
        break_style()
    } else {
        running_style()
    };
    Span::styled(text, style)
}

/// Render the bottom bar: streak, today's totals, timers, history and toast
pub fn render_status_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let now = app.now();
    let mut spans = vec![
        Span::styled(
            format!(" Streak {}d", app.daily.streak_days),
            modal_title_style(),
        ),
        Span::raw(SEPARATOR),
        Span::styled(
            format!(
                "{} done · {} today",
                app.daily.completed_today,
                format_hours(app.daily.total_time_today)
            ),
            default_style(),
        ),
        Span::raw(SEPARATOR),
        focus_span(app.timers.focus(), now),
        Span::raw(SEPARATOR),
        pomodoro_span(app.timers.pomodoro(), app.timers.pomodoro_paused()),
    ];

    // The initial entry cannot be undone
    if app.history.current_index().is_some_and(|i| i > 0) {
        if let Some(entry) = app.history.current() {
            spans.push(Span::raw(SEPARATOR));
            spans.push(Span::styled(format!("u: {}", entry.action), hint_style()));
        }
    }
    if let Some(label) = app.history.next_redo_label() {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(format!("U: {}", label), hint_style()));
    }

    if let Some(toast) = &app.toast {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(toast.message.clone(), modal_title_style()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    f.render_widget(paragraph, area);
}
