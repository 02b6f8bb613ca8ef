// UI module for the marketing dashboard
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::state::{AppScreen, InputMode};
use crate::app::App;
use ratatui::Frame;

/// Draws one frame. Takes `&mut App` for the spinner state and the scroll
/// viewports that follow the selection.
pub fn ui(app: &mut App, f: &mut Frame<'_>) {
    if app.state().is_loading {
        screens::loading::render_loading(app, f);
    } else if app.state().error.is_some() {
        screens::error::render_error(app, f);
    } else {
        match app.screen {
            AppScreen::Dashboard => screens::dashboard::render_dashboard(app, f),
            AppScreen::Grouped => screens::grouped::render_grouped(app, f),
        }
        if app.input_mode == InputMode::Filters {
            screens::filters::render_filter_popup(app, f);
        }
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}
