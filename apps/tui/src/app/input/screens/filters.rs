use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, FilterSection};
use crossterm::event::KeyCode;

pub fn handle_filter_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.close_filters(),
        KeyCode::Tab => app.filter_popup.next_section(),
        _ if app.filter_popup.section == FilterSection::Spend => handle_spend_input(app, key),
        _ => handle_option_list(app, key),
    }
}

fn handle_option_list(app: &mut App, key: KeyCode) {
    let len = app.filter_options().len();
    match key {
        KeyCode::Up => app.filter_popup.cursor = wrap_decrement(app.filter_popup.cursor, len),
        KeyCode::Down => app.filter_popup.cursor = wrap_increment(app.filter_popup.cursor, len),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_filter_option(),
        KeyCode::Backspace => {
            app.filter_popup.query.pop();
            app.filter_popup.cursor = 0;
        }
        KeyCode::Char(c) => {
            app.filter_popup.query.push(c);
            app.filter_popup.cursor = 0;
        }
        _ => {}
    }
}

fn handle_spend_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => app.apply_spend_input(),
        KeyCode::Backspace => {
            app.filter_popup.spend_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | ' ') => {
            app.filter_popup.spend_input.push(c);
        }
        _ => {}
    }
}
