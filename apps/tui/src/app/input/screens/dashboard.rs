use crate::app::input::helpers::sort_field_for_digit;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Right | KeyCode::Char('n') => app.next_page(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_page(),
        KeyCode::Home => app.go_to_page(1),
        KeyCode::End => app.last_page(),
        KeyCode::PageUp => app.select_first(),
        KeyCode::PageDown => app.select_last(),
        KeyCode::Char('+' | '=') => app.cycle_page_size(true),
        KeyCode::Char('-') => app.cycle_page_size(false),
        KeyCode::Char('c') => app.next_chart_tab(),
        KeyCode::Char('0') => app.clear_sort(),
        KeyCode::Char(ch) => {
            if let Some(field) = sort_field_for_digit(ch) {
                app.toggle_sort(field);
            }
        }
        _ => {}
    }
}
