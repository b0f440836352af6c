use crate::app::PlannerState;
use crate::domain::format_hours;
use crate::planner::Suggestion;
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style, priority_style, selected_style},
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the daily planner modal
pub fn render_planner_modal(f: &mut Frame, planner: &PlannerState, area: Rect) {
    let mut lines = vec![
        Line::raw(""),
        Line::raw("  Pick what you will work on today."),
        Line::raw(""),
    ];

    if planner.suggestions.is_empty() {
        lines.push(Line::raw("  No suggestions. Add some tasks first."));
    }

    for (idx, suggestion) in planner.suggestions.iter().enumerate() {
        let chosen = planner.selected.get(idx).copied().unwrap_or(false);
        lines.push(suggestion_line(suggestion, chosen, idx == planner.cursor));
        lines.push(Line::styled(
            format!("        {}", suggestion.reason.label()),
            hint_style(),
        ));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  [Space]", modal_title_style()),
        Span::raw(" Select  "),
        Span::styled("[Enter]", modal_title_style()),
        Span::raw(" Start day  "),
        Span::styled("[Esc]", modal_title_style()),
        Span::raw(" Skip"),
    ]));

    let modal_area = create_modal_area(area, lines.len() as u16 + 2);
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Plan Your Day ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Format: [x] Write copy (Website)  [high]  1h  due 2026-05-01
fn suggestion_line(suggestion: &Suggestion, chosen: bool, highlighted: bool) -> Line<'static> {
    let mark = if chosen { "[x]" } else { "[ ]" };
    let base = if highlighted {
        selected_style()
    } else {
        Style::default()
    };
    let mut spans = vec![
        Span::styled(
            format!(
                "  {} {} ({})",
                mark, suggestion.task_description, suggestion.project_name
            ),
            base,
        ),
        Span::styled(
            format!("  [{}]", suggestion.priority.label()),
            priority_style(suggestion.priority).patch(base),
        ),
    ];
    if suggestion.estimated_time > 0.0 {
        spans.push(Span::styled(
            format!("  {}", format_hours(suggestion.estimated_time)),
            base,
        ));
    }
    if let Some(due) = suggestion.due_date {
        spans.push(Span::styled(format!("  due {}", due), base));
    }
    Line::from(spans)
}
