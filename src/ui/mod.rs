pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod planner_pane;
pub mod status_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_confirm_modal, render_help_modal, render_history_modal};
use planner_pane::render_planner_modal;
use ratatui::Frame;
use status_pane::render_status_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, app.view, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_status_pane(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::Form => render_input_form(f, app, size),
        UiMode::Planner => {
            if let Some(planner) = &app.planner {
                render_planner_modal(f, planner, size);
            }
        }
        UiMode::ConfirmDelete => render_confirm_modal(f, app, size),
        UiMode::Help => render_help_modal(f, size),
        UiMode::History => render_history_modal(f, &app.history, size),
        UiMode::Normal => {}
    }
}
