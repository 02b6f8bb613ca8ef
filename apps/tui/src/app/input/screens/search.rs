use crate::app::state::App;
use crossterm::event::KeyCode;
use std::time::Instant;

/// Typing only marks the query dirty; the event loop applies it once the
/// debounce window has passed.
pub fn handle_search_input(app: &mut App, key: KeyCode, now: Instant) {
    match key {
        KeyCode::Char(c) => {
            app.search.buffer.push(c);
            app.search.edited(now);
        }
        KeyCode::Backspace => {
            if app.search.buffer.pop().is_some() {
                app.search.edited(now);
            }
        }
        KeyCode::Enter => app.commit_search(),
        KeyCode::Esc => app.cancel_search(),
        _ => {}
    }
}
