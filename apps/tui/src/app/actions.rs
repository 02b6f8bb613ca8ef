// User-level commands. Each one turns a key press into store actions and
// leaves a short status message behind.

use crate::app::state::{App, AppScreen, FilterSection, InputMode};
use marketing_dashboard::domain::{
    toggle_membership, FiltersPatch, SortConfig, SortField, SpendRange, PAGE_SIZE_OPTIONS,
};
use marketing_dashboard::presentation::FlatRow;
use marketing_dashboard::store::Action;
use tracing::debug;

impl App {
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
        self.status_message = "Reloading data...".to_string();
    }

    pub fn switch_screen(&mut self) {
        self.screen = match self.screen {
            AppScreen::Dashboard => AppScreen::Grouped,
            AppScreen::Grouped => AppScreen::Dashboard,
        };
    }

    pub fn next_chart_tab(&mut self) {
        self.chart_tab_index = (self.chart_tab_index + 1) % 2;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        let sorting = self.state().sorting.toggled(field);
        self.dispatch(Action::SetSorting(sorting));
        self.status_message = format!(
            "Sorted by {} {}",
            field.label(),
            sorting.direction.arrow()
        );
    }

    pub fn clear_sort(&mut self) {
        self.dispatch(Action::SetSorting(SortConfig::default()));
        self.status_message = "Sorting cleared".to_string();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.dispatch(Action::SetCurrentPage(page));
        self.selected_row = 0;
    }

    pub fn next_page(&mut self) {
        let pagination = self.state().pagination;
        if pagination.has_next_page() {
            self.go_to_page(pagination.current_page + 1);
        }
    }

    pub fn previous_page(&mut self) {
        let pagination = self.state().pagination;
        if pagination.has_previous_page() {
            self.go_to_page(pagination.current_page - 1);
        }
    }

    pub fn last_page(&mut self) {
        let total_pages = self.state().pagination.total_pages;
        if total_pages > 0 {
            self.go_to_page(total_pages);
        }
    }

    /// Steps through the page size options; `forward` picks the next larger.
    pub fn cycle_page_size(&mut self, forward: bool) {
        let current = self.state().pagination.page_size;
        let position = PAGE_SIZE_OPTIONS.iter().position(|size| *size == current);
        let next = match (position, forward) {
            (Some(index), true) => PAGE_SIZE_OPTIONS[(index + 1) % PAGE_SIZE_OPTIONS.len()],
            (Some(index), false) => {
                PAGE_SIZE_OPTIONS[(index + PAGE_SIZE_OPTIONS.len() - 1) % PAGE_SIZE_OPTIONS.len()]
            }
            (None, _) => PAGE_SIZE_OPTIONS[0],
        };
        self.dispatch(Action::SetPageSize(next));
        self.selected_row = 0;
        self.status_message = format!("Showing {next} rows per page");
    }

    pub fn begin_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search.buffer = self.state().filters.search_query.clone();
        self.search.pending_since = None;
    }

    pub fn apply_search(&mut self, query: String) {
        debug!(%query, "search applied");
        self.dispatch(Action::SetFilters(FiltersPatch::search(query)));
        self.selected_row = 0;
    }

    /// Applies whatever is typed right away, skipping the debounce.
    pub fn commit_search(&mut self) {
        self.search.pending_since = None;
        let query = self.search.buffer.clone();
        if query != self.state().filters.search_query {
            self.apply_search(query);
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_search(&mut self) {
        self.search.pending_since = None;
        self.search.buffer = self.state().filters.search_query.clone();
        self.input_mode = InputMode::Normal;
    }

    pub fn open_filters(&mut self) {
        self.input_mode = InputMode::Filters;
        self.filter_popup.query.clear();
        self.filter_popup.cursor = 0;
        self.filter_popup.spend_input = self
            .state()
            .filters
            .spend_range
            .map(|range| format!("{}-{}", range.min, range.max))
            .unwrap_or_default();
    }

    pub fn close_filters(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Toggles the option under the cursor in the focused filter list.
    pub fn toggle_filter_option(&mut self) {
        let Some(value) = self
            .filter_options()
            .get(self.filter_popup.cursor)
            .map(|value| (*value).to_string())
        else {
            return;
        };

        let filters = &self.state().filters;
        let patch = match self.filter_popup.section {
            FilterSection::Channels => {
                FiltersPatch::channels(toggle_membership(&filters.channels, &value))
            }
            FilterSection::Regions => {
                FiltersPatch::regions(toggle_membership(&filters.regions, &value))
            }
            FilterSection::Spend => return,
        };
        self.dispatch(Action::SetFilters(patch));
        self.selected_row = 0;
    }

    /// Parses the spend input; an empty input clears the range.
    pub fn apply_spend_input(&mut self) {
        let input = self.filter_popup.spend_input.trim().to_string();
        if input.is_empty() {
            self.dispatch(Action::SetFilters(FiltersPatch::spend_range(None)));
            self.status_message = "Spend range cleared".to_string();
            return;
        }

        match SpendRange::parse(&input) {
            Some(range) => {
                self.dispatch(Action::SetFilters(FiltersPatch::spend_range(Some(range))));
                self.status_message = format!("Spend range {}-{}", range.min, range.max);
            }
            None => {
                self.status_message =
                    format!("Error: invalid spend range {input:?}, use min-max");
            }
        }
    }

    pub fn reset_filters(&mut self) {
        self.dispatch(Action::ResetFilters);
        self.search = Default::default();
        self.selected_row = 0;
        self.status_message = "Filters reset".to_string();
    }

    pub fn move_selection(&mut self, delta: isize) {
        match self.screen {
            AppScreen::Dashboard => {
                self.selected_row = step(self.selected_row, delta, self.snapshot.page.len());
            }
            AppScreen::Grouped => {
                self.selected_group_row =
                    step(self.selected_group_row, delta, self.grouped.len());
            }
        }
    }

    pub fn select_first(&mut self) {
        match self.screen {
            AppScreen::Dashboard => self.selected_row = 0,
            AppScreen::Grouped => self.selected_group_row = 0,
        }
    }

    pub fn select_last(&mut self) {
        match self.screen {
            AppScreen::Dashboard => self.selected_row = self.snapshot.page.len().saturating_sub(1),
            AppScreen::Grouped => self.selected_group_row = self.grouped.len().saturating_sub(1),
        }
    }

    /// Expands or collapses the region of the selected grouped row. On a
    /// channel row the selection jumps back to its region.
    pub fn toggle_selected_region(&mut self) {
        let Some(region) = self
            .grouped
            .region_at(self.selected_group_row)
            .map(str::to_string)
        else {
            return;
        };

        self.grouped.toggle(&region);
        if let Some(index) = self
            .grouped
            .groups()
            .iter()
            .position(|group| group.region == region)
        {
            self.selected_group_row = region_row_index(self, index);
        }
    }

    pub fn expand_all_regions(&mut self) {
        self.grouped.expand_all();
        self.status_message = "All regions expanded".to_string();
    }

    pub fn collapse_all_regions(&mut self) {
        self.grouped.collapse_all();
        self.selected_group_row = self
            .selected_group_row
            .min(self.grouped.len().saturating_sub(1));
        self.status_message = "All regions collapsed".to_string();
    }
}

/// Flat row index of the region row for group `group_index`.
fn region_row_index(app: &App, group_index: usize) -> usize {
    app.grouped
        .rows()
        .iter()
        .position(|row| {
            matches!(row, FlatRow::Region { group, .. } if *group == group_index)
        })
        .unwrap_or(0)
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
