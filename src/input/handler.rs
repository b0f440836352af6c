use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Form => handle_input_form_mode(app, key),
        UiMode::Planner => handle_planner_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_mode(app, key),
        UiMode::Help | UiMode::History => {
            // Any key closes the overlay
            app.ui_mode = UiMode::Normal;
            app.needs_render = true;
            Ok(false)
        }
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up => {
            if shift {
                app.reorder_selected(-1);
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down => {
            if shift {
                app.reorder_selected(1);
            } else {
                app.move_selection_down();
            }
        }
        KeyCode::Left | KeyCode::Right => app.switch_board_column(),
        KeyCode::Char('v') => app.cycle_view(),

        // Undo / redo
        KeyCode::Char('z') | KeyCode::Char('Z') if ctrl && shift => {
            app.redo();
        }
        KeyCode::Char('z') if ctrl => {
            app.undo();
        }
        KeyCode::Char('y') if ctrl => {
            app.redo();
        }
        KeyCode::Char('u') => {
            app.undo();
        }
        KeyCode::Char('U') => {
            app.redo();
        }

        // Editing
        KeyCode::Enter => {
            app.toggle_selected();
        }
        KeyCode::Char('P') => app.start_new_project(false),
        KeyCode::Char('C') => app.start_new_project(true),
        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('s') => app.start_add_subtask(),
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => {
            app.archive_selected_project();
        }
        KeyCode::Char('R') => {
            app.restore_selected();
        }
        KeyCode::Char('M') => app.start_move_task(),
        KeyCode::Char('m') => {
            app.move_selected_project_board();
        }
        KeyCode::Char('g') => app.start_new_goal(),
        KeyCode::Char('G') => app.start_link_to_goal(),

        // Focus session
        KeyCode::Char('f') => {
            app.start_focus();
        }
        KeyCode::Char('p') => {
            app.toggle_focus();
        }
        KeyCode::Char('S') => {
            app.stop_focus();
        }

        // Pomodoro
        KeyCode::Char('t') => {
            app.start_pomodoro_on_selected();
        }
        KeyCode::Char('o') => {
            app.toggle_pomodoro();
        }
        KeyCode::Char('T') => {
            app.stop_pomodoro();
        }

        KeyCode::Char('D') => app.open_planner(),
        KeyCode::Char('?') => {
            app.ui_mode = UiMode::Help;
            app.needs_render = true;
        }
        KeyCode::Char('H') => {
            app.ui_mode = UiMode::History;
            app.needs_render = true;
        }
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        _ => {}
    }

    Ok(false)
}

/// Handle keys while an input form is open
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Tab => app.input_form_toggle_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the daily planner
fn handle_planner_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.start_day();
        }
        KeyCode::Esc => app.skip_planning(),
        _ => {
            if let Some(planner) = &mut app.planner {
                match key.code {
                    KeyCode::Up => planner.move_up(),
                    KeyCode::Down => planner.move_down(),
                    KeyCode::Char(' ') => planner.toggle_current(),
                    _ => return Ok(false),
                }
                app.needs_render = true;
            }
        }
    }
    Ok(false)
}

/// Handle keys in the delete confirmation
fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.confirm_delete();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::domain::{ProjectDraft, TaskDraft, View};
    use crate::notifications::RecordingNotifier;
    use crate::persistence::{MemoryStore, Settings};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn create_test_app() -> AppState {
        let mut app = AppState::new(
            Box::new(MemoryStore::default()),
            Box::new(RecordingNotifier::default()),
            Box::new(ManualClock::at(2026, 6, 2, 9, 0, 0)),
            Settings::default(),
        );
        let p = app.create_project(ProjectDraft {
            name: "Inbox".to_string(),
            ..Default::default()
        });
        app.add_task(
            p,
            TaskDraft {
                description: "Test task".to_string(),
                ..Default::default()
            },
        );
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_navigation() {
        let mut app = create_test_app();
        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 2);

        // Stays on the last row
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 2);

        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_handle_add_task() {
        let mut app = create_test_app();
        app.selected_index = 1;

        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Form);

        type_text(&mut app, "New task");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        let project = app.graph.projects.values().next().unwrap();
        assert_eq!(project.tasks.len(), 2);
        assert_eq!(project.tasks[1].description, "New task");
    }

    #[test]
    fn test_form_keys_do_not_trigger_commands() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('g'))).unwrap();
        // 'q' is text inside a form
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!should_quit);
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.graph.goals.is_empty());
    }

    #[test]
    fn test_handle_toggle_and_undo() {
        let mut app = create_test_app();
        app.selected_index = 2;

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.graph.projects.values().next().unwrap().tasks[0].completed);

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL)).unwrap();
        assert!(!app.graph.projects.values().next().unwrap().tasks[0].completed);

        handle_key(&mut app, key(KeyCode::Char('U'))).unwrap();
        assert!(app.graph.projects.values().next().unwrap().tasks[0].completed);
    }

    #[test]
    fn test_handle_delete_with_confirmation() {
        let mut app = create_test_app();
        app.selected_index = 2;

        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.graph.projects.values().next().unwrap().tasks.len(), 1);

        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.graph.projects.values().next().unwrap().tasks.is_empty());
    }

    #[test]
    fn test_handle_focus_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('f'))).unwrap();
        assert!(app.timers.focus().is_active);

        handle_key(&mut app, key(KeyCode::Char('p'))).unwrap();
        assert!(app.timers.focus().is_paused);

        handle_key(&mut app, key(KeyCode::Char('S'))).unwrap();
        assert!(app.timers.focus().is_idle());
    }

    #[test]
    fn test_handle_planner_select_and_start() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('D'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Planner);

        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.graph.planned_tasks().len(), 1);
        assert!(!app.planning.needs_planning(app.today()));
    }

    #[test]
    fn test_handle_view_cycle_and_help() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('v'))).unwrap();
        assert_eq!(app.view, View::Board);

        handle_key(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Help);
        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_history_overlay() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('H'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::History);

        // Closing the overlay does not undo
        let recorded = app.history.len();
        handle_key(&mut app, key(KeyCode::Char('u'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.history.current_index(), Some(recorded - 1));
    }
}
