use crate::app::state::{App, InputMode};
use crossterm::event::KeyCode;

/// Handles F1 / `?` and swallows every other key while help is open.
pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    let question_mark = key == KeyCode::Char('?') && app.input_mode == InputMode::Normal;
    if key == KeyCode::F(1) || (question_mark && !app.show_help) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if matches!(key, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
            app.show_help = false;
        }
        return true;
    }

    false
}
