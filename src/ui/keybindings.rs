use crate::domain::{UiMode, View};
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Hint text for the current mode and view
pub fn hint_text(mode: UiMode, view: View) -> &'static str {
    match mode {
        UiMode::Form => " Tab next field   Enter save   Esc cancel",
        UiMode::Planner => " ↑/↓ move   Space select   Enter start day   Esc skip",
        UiMode::ConfirmDelete => " y delete   n cancel",
        UiMode::Help => " any key closes help",
        UiMode::History => " any key closes history",
        UiMode::Normal => match view {
            View::Archive => " ↑/↓ select   R restore   v view   u/U undo/redo   ? help   q quit",
            View::Goals => {
                " ↑/↓ select   g goal   e edit   x delete   v view   u/U undo/redo   ? help   q quit"
            }
            View::Board => {
                " ↑/↓ select   ←/→ column   m move board   a task   Enter done   f focus   t pomodoro   v view   ? help"
            }
            _ => {
                " ↑/↓ select   P project   a task   s subtask   M move   Enter done   e edit   x delete   f focus   t pomodoro   v view   ? help"
            }
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, view: View, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hint_text(mode, view))).style(hint_style());
    f.render_widget(paragraph, area);
}
