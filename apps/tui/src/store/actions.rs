use crate::domain::{Filters, FiltersPatch, SortConfig};
use crate::store::state::{MarketingState, Records};

/// Discrete state transitions. Every action is total: out-of-range values
/// are stored as given and guarded by consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetData(Records),
    SetLoading(bool),
    SetError(Option<String>),
    SetFilters(FiltersPatch),
    SetSorting(SortConfig),
    SetCurrentPage(usize),
    SetPageSize(usize),
    UpdatePaginationMeta {
        total_pages: usize,
        total_records: usize,
    },
    ResetFilters,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetData(_) => "set_data",
            Self::SetLoading(_) => "set_loading",
            Self::SetError(_) => "set_error",
            Self::SetFilters(_) => "set_filters",
            Self::SetSorting(_) => "set_sorting",
            Self::SetCurrentPage(_) => "set_current_page",
            Self::SetPageSize(_) => "set_page_size",
            Self::UpdatePaginationMeta { .. } => "update_pagination_meta",
            Self::ResetFilters => "reset_filters",
        }
    }
}

/// Pure reducer: the next state after applying `action` to `state`.
pub fn reduce(state: &MarketingState, action: &Action) -> MarketingState {
    let mut next = state.clone();
    match action {
        Action::SetData(records) => {
            next.raw_data = records.clone();
            next.is_loading = false;
        }
        Action::SetLoading(loading) => {
            next.is_loading = *loading;
        }
        Action::SetError(error) => {
            next.error.clone_from(error);
            next.is_loading = false;
        }
        Action::SetFilters(patch) => {
            next.filters = state.filters.merged(patch);
            next.pagination.current_page = 1;
        }
        Action::SetSorting(sorting) => {
            next.sorting = *sorting;
        }
        Action::SetCurrentPage(page) => {
            next.pagination.current_page = *page;
        }
        Action::SetPageSize(page_size) => {
            next.pagination.page_size = *page_size;
            next.pagination.current_page = 1;
        }
        Action::UpdatePaginationMeta {
            total_pages,
            total_records,
        } => {
            next.pagination.total_pages = *total_pages;
            next.pagination.total_records = *total_records;
        }
        Action::ResetFilters => {
            next.filters = Filters::default();
            next.pagination.current_page = 1;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketingRecord, SortDirection, SortField, SpendRange};
    use std::sync::Arc;

    fn sample() -> Records {
        Arc::from(vec![MarketingRecord {
            id: 1,
            channel: "Search".to_string(),
            region: "US".to_string(),
            spend: 100.0,
            impressions: 1000,
            clicks: 50,
            conversions: 5,
        }])
    }

    fn on_page(page: usize) -> MarketingState {
        let mut state = MarketingState::default();
        state.pagination.current_page = page;
        state
    }

    #[test]
    fn set_data_replaces_records_and_clears_loading() {
        let state = reduce(&MarketingState::default(), &Action::SetLoading(true));
        assert!(state.is_loading);

        let records = sample();
        let state = reduce(&state, &Action::SetData(records.clone()));
        assert!(!state.is_loading);
        assert!(Arc::ptr_eq(&state.raw_data, &records));
    }

    #[test]
    fn set_error_stops_loading() {
        let state = reduce(&MarketingState::default(), &Action::SetLoading(true));
        let state = reduce(&state, &Action::SetError(Some("boom".to_string())));
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.is_loading);

        let state = reduce(&state, &Action::SetError(None));
        assert_eq!(state.error, None);
    }

    #[test]
    fn filter_changes_reset_page() {
        let state = reduce(
            &on_page(4),
            &Action::SetFilters(FiltersPatch::regions(["US"])),
        );
        assert_eq!(state.pagination.current_page, 1);
        assert!(state.filters.regions.contains("US"));

        let state = reduce(
            &MarketingState {
                pagination: on_page(3).pagination,
                ..state
            },
            &Action::ResetFilters,
        );
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.filters, Filters::default());
    }

    #[test]
    fn page_size_change_resets_page() {
        let state = reduce(&on_page(5), &Action::SetPageSize(25));
        assert_eq!(state.pagination.page_size, 25);
        assert_eq!(state.pagination.current_page, 1);
    }

    #[test]
    fn sorting_and_meta_updates_keep_page() {
        let sorting = SortConfig::new(SortField::Spend, SortDirection::Descending);
        let state = reduce(&on_page(7), &Action::SetSorting(sorting));
        assert_eq!(state.sorting, sorting);
        assert_eq!(state.pagination.current_page, 7);

        let state = reduce(
            &state,
            &Action::UpdatePaginationMeta {
                total_pages: 2,
                total_records: 80,
            },
        );
        assert_eq!(state.pagination.current_page, 7);
        assert_eq!(state.pagination.total_pages, 2);
        assert_eq!(state.pagination.total_records, 80);
        assert!(!state.pagination.has_next_page());
    }

    #[test]
    fn out_of_range_page_is_stored_as_given() {
        let state = reduce(&MarketingState::default(), &Action::SetCurrentPage(999));
        assert_eq!(state.pagination.current_page, 999);
        let state = reduce(&state, &Action::SetCurrentPage(0));
        assert_eq!(state.pagination.current_page, 0);
        assert!(!state.pagination.has_previous_page());
    }

    #[test]
    fn spend_range_patch_can_clear() {
        let state = reduce(
            &MarketingState::default(),
            &Action::SetFilters(FiltersPatch::spend_range(Some(SpendRange::new(1.0, 5.0)))),
        );
        assert!(state.filters.spend_range.is_some());
        let state = reduce(&state, &Action::SetFilters(FiltersPatch::spend_range(None)));
        assert!(state.filters.spend_range.is_none());
    }
}
