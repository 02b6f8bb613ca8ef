use crate::domain::{Filters, MarketingRecord, PaginationConfig, SortConfig};
use std::sync::Arc;

/// Shared, immutable record sequence. Views are compared by pointer, so a
/// new load always produces a new allocation.
pub type Records = Arc<[MarketingRecord]>;

/// Everything the dashboard knows about the loaded dataset and how the user
/// is looking at it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketingState {
    pub raw_data: Records,
    pub filters: Filters,
    pub sorting: SortConfig,
    pub pagination: PaginationConfig,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for MarketingState {
    fn default() -> Self {
        Self {
            raw_data: Arc::from(Vec::new()),
            filters: Filters::default(),
            sorting: SortConfig::default(),
            pagination: PaginationConfig::default(),
            is_loading: false,
            error: None,
        }
    }
}

impl MarketingState {
    pub fn with_page_size(page_size: usize) -> Self {
        let mut state = Self::default();
        state.pagination.page_size = page_size;
        state
    }

    pub fn has_data(&self) -> bool {
        !self.raw_data.is_empty()
    }
}
