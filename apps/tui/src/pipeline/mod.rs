// Derived-view pipeline: filter -> sort -> paginate, plus metrics, chart
// buckets and unique dimension values. Every stage is memoized on its
// inputs so an unrelated state change recomputes nothing.

pub mod memo;
pub mod selectors;

pub use memo::{ByAddress, Memo};

use crate::domain::{ChartDataPoint, ComputedMetrics, Filters, MarketingRecord, SortConfig};
use crate::store::{MarketingState, Records};
use std::sync::Arc;

/// Shared slice produced by a pipeline stage.
pub type View = Arc<[MarketingRecord]>;

type PageKey = (ByAddress<[MarketingRecord]>, usize, usize);

/// Recompute counts per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub filtered: u64,
    pub sorted: u64,
    pub paginated: u64,
    pub metrics: u64,
    pub chart: u64,
    pub unique_channels: u64,
    pub unique_regions: u64,
}

#[derive(Debug, Default)]
pub struct DerivedViews {
    filtered: Memo<(ByAddress<[MarketingRecord]>, Filters), View>,
    sorted: Memo<(ByAddress<[MarketingRecord]>, SortConfig), View>,
    paginated: Memo<PageKey, View>,
    metrics: Memo<ByAddress<[MarketingRecord]>, ComputedMetrics>,
    chart: Memo<ByAddress<[MarketingRecord]>, Arc<[ChartDataPoint]>>,
    unique_channels: Memo<ByAddress<[MarketingRecord]>, Arc<[String]>>,
    unique_regions: Memo<ByAddress<[MarketingRecord]>, Arc<[String]>>,
}

impl DerivedViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filtered(&mut self, state: &MarketingState) -> View {
        let key = (ByAddress::new(&state.raw_data), state.filters.clone());
        self.filtered.get_or_compute(key, |(raw, filters)| {
            let view: View = Arc::from(selectors::filter_records(&raw.0, filters));
            tracing::trace!(
                input = raw.0.len(),
                output = view.len(),
                "filtered view recomputed"
            );
            view
        })
    }

    /// The filtered view in sort order. With no sort field this is the
    /// filtered view itself, so downstream keys stay stable.
    pub fn sorted(&mut self, state: &MarketingState) -> View {
        let filtered = self.filtered(state);
        let key = (ByAddress::new(&filtered), state.sorting);
        self.sorted.get_or_compute(key, |(filtered, sorting)| {
            match selectors::sort_records(&filtered.0, sorting) {
                Some(sorted) => {
                    tracing::trace!(
                        field = sorting.field.map(|f| f.as_str()),
                        direction = sorting.direction.as_str(),
                        "sorted view recomputed"
                    );
                    Arc::from(sorted)
                }
                None => Arc::clone(&filtered.0),
            }
        })
    }

    pub fn paginated(&mut self, state: &MarketingState) -> View {
        let sorted = self.sorted(state);
        let key = (
            ByAddress::new(&sorted),
            state.pagination.current_page,
            state.pagination.page_size,
        );
        self.paginated.get_or_compute(key, |(sorted, page, page_size)| {
            Arc::from(selectors::paginate(&sorted.0, *page, *page_size))
        })
    }

    pub fn metrics(&mut self, state: &MarketingState) -> ComputedMetrics {
        let filtered = self.filtered(state);
        self.metrics
            .get_or_compute(ByAddress::new(&filtered), |view| {
                selectors::compute_metrics(&view.0)
            })
    }

    pub fn chart_data(&mut self, state: &MarketingState) -> Arc<[ChartDataPoint]> {
        let filtered = self.filtered(state);
        self.chart.get_or_compute(ByAddress::new(&filtered), |view| {
            Arc::from(selectors::chart_data(&view.0))
        })
    }

    /// Distinct channels of the whole dataset, independent of filters.
    pub fn unique_channels(&mut self, raw_data: &Records) -> Arc<[String]> {
        self.unique_channels
            .get_or_compute(ByAddress::new(raw_data), |raw| {
                Arc::from(selectors::unique_channels(&raw.0))
            })
    }

    pub fn unique_regions(&mut self, raw_data: &Records) -> Arc<[String]> {
        self.unique_regions
            .get_or_compute(ByAddress::new(raw_data), |raw| {
                Arc::from(selectors::unique_regions(&raw.0))
            })
    }

    /// `(total_pages, total_records)` for the current filtered view.
    pub fn pagination_meta(&mut self, state: &MarketingState) -> (usize, usize) {
        let total_records = self.filtered(state).len();
        (
            selectors::total_pages(total_records, state.pagination.page_size),
            total_records,
        )
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            filtered: self.filtered.computations(),
            sorted: self.sorted.computations(),
            paginated: self.paginated.computations(),
            metrics: self.metrics.computations(),
            chart: self.chart.computations(),
            unique_channels: self.unique_channels.computations(),
            unique_regions: self.unique_regions.computations(),
        }
    }
}
