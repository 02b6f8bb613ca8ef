use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use marketing_dashboard::config::AppConfig;
use marketing_dashboard::domain::{ChartDataPoint, ComputedMetrics};
use marketing_dashboard::pipeline::{DerivedViews, View};
use marketing_dashboard::preprocess::{DatasetMetadata, PreprocessWorker, WorkerError};
use marketing_dashboard::presentation::{GroupedTable, Viewport};
use marketing_dashboard::store::{Action, MarketingState, Store};
use std::sync::Arc;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

/// Delay between the last keystroke in the search box and the filter update.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    Grouped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSection {
    Channels,
    Regions,
    Spend,
}

impl FilterSection {
    pub const fn next(self) -> Self {
        match self {
            Self::Channels => Self::Regions,
            Self::Regions => Self::Spend,
            Self::Spend => Self::Channels,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Channels => "Channels",
            Self::Regions => "Regions",
            Self::Spend => "Spend range",
        }
    }
}

/// Filter popup state: which list is focused, the fuzzy query narrowing it
/// and the spend range being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPopup {
    pub section: FilterSection,
    pub query: String,
    pub cursor: usize,
    pub spend_input: String,
}

impl FilterPopup {
    pub const fn new() -> Self {
        Self {
            section: FilterSection::Channels,
            query: String::new(),
            cursor: 0,
            spend_input: String::new(),
        }
    }

    pub fn next_section(&mut self) {
        self.section = self.section.next();
        self.query.clear();
        self.cursor = 0;
    }
}

/// Options matching `query`, best fuzzy score first. An empty query keeps
/// every option in its listed order.
pub fn narrow_options<'a>(options: &'a [String], query: &str) -> Vec<&'a str> {
    if query.is_empty() {
        return options.iter().map(String::as_str).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, &str)> = options
        .iter()
        .filter_map(|option| {
            matcher
                .fuzzy_match(option, query)
                .map(|score| (score, option.as_str()))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, option)| option).collect()
}

/// Search box contents plus the instant of the last unapplied edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchInput {
    pub buffer: String,
    pub pending_since: Option<Instant>,
}

impl SearchInput {
    pub fn edited(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// The query to apply once the debounce window has passed.
    pub fn due(&mut self, now: Instant) -> Option<String> {
        let since = self.pending_since?;
        if now.duration_since(since) < SEARCH_DEBOUNCE {
            return None;
        }
        self.pending_since = None;
        Some(self.buffer.clone())
    }
}

/// Everything the renderer reads from the pipeline for one frame.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub page: View,
    pub metrics: ComputedMetrics,
    pub chart: Arc<[ChartDataPoint]>,
    pub channels: Arc<[String]>,
    pub regions: Arc<[String]>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            page: Arc::from(Vec::new()),
            metrics: ComputedMetrics::default(),
            chart: Arc::from(Vec::new()),
            channels: Arc::from(Vec::new()),
            regions: Arc::from(Vec::new()),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub store: Store,
    pub views: DerivedViews,
    pub grouped: GroupedTable,
    pub worker: PreprocessWorker,
    pub snapshot: ViewSnapshot,
    pub metadata: Option<DatasetMetadata>,
    pub screen: AppScreen,
    pub input_mode: InputMode,
    pub search: SearchInput,
    pub filter_popup: FilterPopup,
    pub selected_row: usize,
    pub table_viewport: Viewport,
    pub selected_group_row: usize,
    pub grouped_viewport: Viewport,
    pub chart_tab_index: usize,
    pub show_help: bool,
    pub status_message: String,
    pub reload_requested: bool,
    pub throbber_state: ThrobberState,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, WorkerError> {
        Ok(Self::with_worker(config, PreprocessWorker::spawn()?))
    }

    pub fn with_worker(config: AppConfig, worker: PreprocessWorker) -> Self {
        let store = Store::new(MarketingState::with_page_size(config.page_size));
        Self {
            running: true,
            config,
            store,
            views: DerivedViews::new(),
            grouped: GroupedTable::new(),
            worker,
            snapshot: ViewSnapshot::default(),
            metadata: None,
            screen: AppScreen::Dashboard,
            input_mode: InputMode::Normal,
            search: SearchInput::default(),
            filter_popup: FilterPopup::new(),
            selected_row: 0,
            table_viewport: Viewport::default(),
            selected_group_row: 0,
            grouped_viewport: Viewport::default(),
            chart_tab_index: 0,
            show_help: false,
            status_message: String::new(),
            reload_requested: true,
            throbber_state: ThrobberState::default(),
        }
    }

    pub const fn state(&self) -> &MarketingState {
        self.store.state()
    }

    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    /// Per-frame housekeeping: spinner animation and debounced search.
    pub fn tick(&mut self, now: Instant) {
        if self.state().is_loading {
            self.throbber_state.calc_next();
        }

        if let Some(query) = self.search.due(now) {
            if query != self.state().filters.search_query {
                self.apply_search(query);
            }
        }
    }

    /// Pulls the current derived views out of the pipeline and keeps the
    /// store's pagination metadata and the selections consistent with them.
    pub fn sync_views(&mut self) {
        let (total_pages, total_records) = self.views.pagination_meta(self.store.state());
        let pagination = self.store.state().pagination;
        if pagination.total_pages != total_pages || pagination.total_records != total_records {
            self.store.dispatch(Action::UpdatePaginationMeta {
                total_pages,
                total_records,
            });
        }

        let state = self.store.state();
        let filtered = self.views.filtered(state);
        self.snapshot = ViewSnapshot {
            page: self.views.paginated(state),
            metrics: self.views.metrics(state),
            chart: self.views.chart_data(state),
            channels: self.views.unique_channels(&state.raw_data),
            regions: self.views.unique_regions(&state.raw_data),
        };
        self.grouped.update(&filtered);

        self.selected_row = self
            .selected_row
            .min(self.snapshot.page.len().saturating_sub(1));
        self.selected_group_row = self
            .selected_group_row
            .min(self.grouped.len().saturating_sub(1));
    }

    /// Options for the focused filter list after fuzzy narrowing.
    pub fn filter_options(&self) -> Vec<&str> {
        let options: &[String] = match self.filter_popup.section {
            FilterSection::Channels => &self.snapshot.channels,
            FilterSection::Regions => &self.snapshot.regions,
            FilterSection::Spend => &[],
        };
        narrow_options(options, &self.filter_popup.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn narrowing_keeps_fuzzy_matches_only() {
        let channels = options(&["Facebook Ads", "Google Search", "Email", "Display"]);

        assert_eq!(narrow_options(&channels, "").len(), 4);

        let matched = narrow_options(&channels, "gs");
        assert_eq!(matched, vec!["Google Search"]);

        assert!(narrow_options(&channels, "zzz").is_empty());
    }

    #[test]
    fn search_is_due_only_after_debounce() {
        let start = Instant::now();
        let mut search = SearchInput {
            buffer: "social".to_string(),
            pending_since: None,
        };
        assert_eq!(search.due(start), None);

        search.edited(start);
        assert_eq!(search.due(start + Duration::from_millis(299)), None);
        assert_eq!(
            search.due(start + SEARCH_DEBOUNCE),
            Some("social".to_string())
        );
        assert_eq!(search.due(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn filter_sections_cycle_and_reset_query() {
        let mut popup = FilterPopup::new();
        popup.query.push('x');
        popup.cursor = 3;
        popup.next_section();
        assert_eq!(popup.section, FilterSection::Regions);
        assert!(popup.query.is_empty());
        assert_eq!(popup.cursor, 0);
        popup.next_section();
        popup.next_section();
        assert_eq!(popup.section, FilterSection::Channels);
    }
}
