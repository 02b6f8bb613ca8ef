use crate::app::state::{App, AppScreen, InputMode};
use crossterm::event::KeyCode;
use std::time::Instant;

mod dashboard;
mod filters;
mod grouped;
mod help;
mod search;
mod status;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.state().is_loading {
        status::handle_loading_input(app, key);
        return;
    }

    if app.state().error.is_some() {
        status::handle_error_input(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Search => search::handle_search_input(app, key, Instant::now()),
        InputMode::Filters => filters::handle_filter_input(app, key),
        InputMode::Normal => {
            if handle_common_keys(app, key) {
                return;
            }
            match app.screen {
                AppScreen::Dashboard => dashboard::handle_dashboard_input(app, key),
                AppScreen::Grouped => grouped::handle_grouped_input(app, key),
            }
        }
    }
}

/// Keys that behave the same on every screen.
fn handle_common_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.switch_screen(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('f') => app.open_filters(),
        KeyCode::Char('x') => app.reset_filters(),
        KeyCode::Char('r') => app.request_reload(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{FilterSection, SEARCH_DEBOUNCE};
    use marketing_dashboard::config::AppConfig;
    use marketing_dashboard::domain::{MarketingRecord, SortDirection, SortField};
    use marketing_dashboard::preprocess::PreprocessWorker;
    use marketing_dashboard::store::Action;
    use std::sync::Arc;

    fn record(id: u64, channel: &str, region: &str, spend: f64) -> MarketingRecord {
        MarketingRecord {
            id,
            channel: channel.to_string(),
            region: region.to_string(),
            spend,
            impressions: 1000,
            clicks: 10,
            conversions: 1,
        }
    }

    fn loaded_app(page_size: usize) -> App {
        let config = AppConfig {
            page_size,
            ..AppConfig::default()
        };
        let mut app = App::with_worker(config, PreprocessWorker::spawn().unwrap());
        app.dispatch(Action::SetData(Arc::from(vec![
            record(1, "Search", "US", 100.0),
            record(2, "Social", "EU", 300.0),
            record(3, "Email", "US", 200.0),
        ])));
        app.reload_requested = false;
        app.sync_views();
        app
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            dispatch_input(app, *key);
            app.sync_views();
        }
    }

    fn page_ids(app: &App) -> Vec<u64> {
        app.snapshot.page.iter().map(|r| r.id).collect()
    }

    #[test]
    fn digit_keys_toggle_sort_direction() {
        let mut app = loaded_app(50);
        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(page_ids(&app), vec![1, 3, 2]);

        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(app.state().sorting.field, Some(SortField::Spend));
        assert_eq!(app.state().sorting.direction, SortDirection::Descending);
        assert_eq!(page_ids(&app), vec![2, 3, 1]);

        press(&mut app, &[KeyCode::Char('0')]);
        assert_eq!(page_ids(&app), vec![1, 2, 3]);
    }

    #[test]
    fn paging_keys_respect_bounds() {
        let mut app = loaded_app(2);
        assert_eq!(app.state().pagination.total_pages, 2);

        press(&mut app, &[KeyCode::Left]);
        assert_eq!(app.state().pagination.current_page, 1);

        press(&mut app, &[KeyCode::Right, KeyCode::Right]);
        assert_eq!(app.state().pagination.current_page, 2);
        assert_eq!(page_ids(&app), vec![3]);

        press(&mut app, &[KeyCode::Char('+')]);
        assert_eq!(app.state().pagination.page_size, 25);
        assert_eq!(app.state().pagination.current_page, 1);
    }

    #[test]
    fn search_applies_after_debounce_or_enter() {
        let mut app = loaded_app(50);
        press(&mut app, &[KeyCode::Char('/')]);
        assert_eq!(app.input_mode, InputMode::Search);

        press(&mut app, &[KeyCode::Char('e'), KeyCode::Char('u')]);
        assert!(app.state().filters.search_query.is_empty());
        assert!(app.search.pending_since.is_some());

        let later = Instant::now() + SEARCH_DEBOUNCE;
        app.tick(later);
        app.sync_views();
        assert_eq!(app.state().filters.search_query, "eu");
        assert_eq!(page_ids(&app), vec![2]);

        press(&mut app, &[KeyCode::Backspace, KeyCode::Backspace, KeyCode::Enter]);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.state().filters.search_query.is_empty());
        assert_eq!(page_ids(&app).len(), 3);
    }

    #[test]
    fn filter_popup_toggles_narrowed_option() {
        let mut app = loaded_app(50);
        press(&mut app, &[KeyCode::Char('f')]);
        assert_eq!(app.input_mode, InputMode::Filters);

        press(&mut app, &[KeyCode::Char('s'), KeyCode::Char('o'), KeyCode::Enter]);
        assert!(app.state().filters.channels.contains("Social"));
        assert_eq!(page_ids(&app), vec![2]);

        press(&mut app, &[KeyCode::Tab, KeyCode::Tab]);
        assert_eq!(app.filter_popup.section, FilterSection::Spend);

        press(&mut app, &[KeyCode::Esc, KeyCode::Char('x')]);
        assert!(app.state().filters.is_empty());
        assert_eq!(page_ids(&app).len(), 3);
    }

    #[test]
    fn spend_range_input_filters_records() {
        let mut app = loaded_app(50);
        press(&mut app, &[KeyCode::Char('f'), KeyCode::Tab, KeyCode::Tab]);
        for c in "150-250".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(page_ids(&app), vec![3]);

        press(&mut app, &[KeyCode::Char('x')]);
        assert_eq!(app.filter_popup.spend_input, "150-250");
        for _ in 0..7 {
            press(&mut app, &[KeyCode::Backspace]);
        }
        press(&mut app, &[KeyCode::Char('9'), KeyCode::Enter]);
        assert!(app.status_message.starts_with("Error"));
    }

    #[test]
    fn grouped_screen_expands_regions() {
        let mut app = loaded_app(50);
        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.screen, AppScreen::Grouped);
        assert_eq!(app.grouped.len(), 2);

        press(&mut app, &[KeyCode::Enter]);
        assert!(app.grouped.is_expanded("US"));
        assert_eq!(app.grouped.len(), 4);

        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert!(!app.grouped.is_expanded("US"));
        assert_eq!(app.selected_group_row, 0);

        press(&mut app, &[KeyCode::Char('e')]);
        assert_eq!(app.grouped.len(), 5);
        press(&mut app, &[KeyCode::End, KeyCode::Char('c')]);
        assert_eq!(app.grouped.len(), 2);
        assert_eq!(app.selected_group_row, 1);
    }

    #[test]
    fn error_screen_offers_retry() {
        let mut app = loaded_app(50);
        app.dispatch(Action::SetError(Some("boom".to_string())));
        app.reload_requested = false;

        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(app.state().sorting.field, None);

        press(&mut app, &[KeyCode::Char('r')]);
        assert!(app.reload_requested);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = loaded_app(50);
        press(&mut app, &[KeyCode::F(1), KeyCode::Char('4')]);
        assert!(app.show_help);
        assert_eq!(app.state().sorting.field, None);

        press(&mut app, &[KeyCode::Esc]);
        assert!(!app.show_help);
        assert!(app.running);

        press(&mut app, &[KeyCode::Char('q')]);
        assert!(!app.running);
    }
}
