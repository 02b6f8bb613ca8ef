use crate::app::state::App;
use crossterm::event::KeyCode;

const PAGE_JUMP: isize = 10;

pub fn handle_grouped_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-PAGE_JUMP),
        KeyCode::PageDown => app.move_selection(PAGE_JUMP),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_region(),
        KeyCode::Char('e') => app.expand_all_regions(),
        KeyCode::Char('c') => app.collapse_all_regions(),
        _ => {}
    }
}
