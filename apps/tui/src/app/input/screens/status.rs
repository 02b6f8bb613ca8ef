use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_loading_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
        app.quit();
    }
}

pub fn handle_error_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('r') | KeyCode::Enter => app.request_reload(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}
