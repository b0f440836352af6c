use crate::app::AppState;
use crate::history::{HistoryEntry, UndoRedoSystem};
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Key groups shown by the help overlay
const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigate",
        &[
            ("↑/↓", "select"),
            ("v", "next view"),
            ("←/→", "board column"),
            ("?", "help"),
            ("q", "quit"),
        ],
    ),
    (
        "Edit",
        &[
            ("P / C", "new project / child project"),
            ("a / s", "new task / subtask"),
            ("e", "edit"),
            ("Enter", "toggle done"),
            ("Shift+↑/↓", "reorder project, task or subtask"),
            ("M", "move task to project / subtask to task"),
            ("m", "move project between boards"),
            ("x", "delete"),
            ("r / R", "archive project / restore"),
            ("g / G", "new goal / link task to goal"),
            ("u / U", "undo / redo"),
            ("H", "edit history"),
        ],
    ),
    (
        "Timers",
        &[
            ("f", "start focus"),
            ("p", "pause or resume focus"),
            ("S", "stop focus"),
            ("t", "Pomodoro on selected task"),
            ("o", "pause or resume Pomodoro"),
            ("T", "stop Pomodoro"),
            ("D", "plan the day"),
        ],
    ),
];

fn modal_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", title), modal_title_style()))
        .style(modal_bg_style())
}

/// Render the delete confirmation modal
pub fn render_confirm_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(label) = app.pending_delete_label() else {
        return;
    };
    let modal_area = create_modal_area(area, 8);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  Delete {}?", label)),
        Line::raw(""),
        Line::raw("  This can be undone with u."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(modal_block("Confirm Delete"))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Render the keybinding help overlay
pub fn render_help_modal(f: &mut Frame, area: Rect) {
    let mut lines = Vec::new();
    for (group, keys) in HELP {
        lines.push(Line::styled(format!("  {}", group), modal_title_style()));
        for (key, action) in keys.iter() {
            lines.push(Line::raw(format!("    {:<12}{}", key, action)));
        }
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw("  Press any key to close"));

    let modal_area = create_modal_area(area, lines.len() as u16 + 2);
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(modal_block("Keys"))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

/// Entries shown at most, newest last
const HISTORY_ROWS: usize = 15;

/// One history row; `is_current` marks the entry matching the live graph
fn history_line(entry: &HistoryEntry, is_current: bool) -> String {
    format!(
        "  {} {}  {:<8}{}",
        if is_current { "▸" } else { " " },
        entry.timestamp.format("%H:%M:%S"),
        entry.data.subject(),
        entry.action
    )
}

/// Render the undo history overlay. Entries after the current one can be redone.
pub fn render_history_modal(f: &mut Frame, history: &UndoRedoSystem, area: Rect) {
    let current = history.current_index();
    let skip = history.len().saturating_sub(HISTORY_ROWS);

    let mut lines = vec![Line::raw("")];
    for (idx, entry) in history.entries().enumerate().skip(skip) {
        let text = history_line(entry, current == Some(idx));
        if current.map_or(true, |c| idx > c) {
            lines.push(Line::styled(text, hint_style()));
        } else {
            lines.push(Line::raw(text));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("  Press any key to close"));

    let modal_area = create_modal_area(area, lines.len() as u16 + 2);
    f.render_widget(Clear, modal_area);

    let title = format!("History ({} of {})", current.map_or(0, |c| c + 1), history.len());
    let paragraph = Paragraph::new(lines)
        .block(modal_block(&title))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}
