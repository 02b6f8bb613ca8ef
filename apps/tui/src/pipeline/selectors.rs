// Pure pipeline stages. Each function depends only on its arguments so the
// memo layer in `pipeline::DerivedViews` can cache it by input.

use crate::calculations::{accumulate_by, calculate_ctr, calculate_roi, Totals};
use crate::domain::{
    ChartDataPoint, ComputedMetrics, Filters, MarketingRecord, SortConfig, SortDirection,
};
use std::collections::BTreeSet;
use std::ops::Range;

pub const CHART_CHANNEL_LIMIT: usize = 10;

/// True when `record` passes every active predicate. `query` must already
/// be lowercased.
pub fn matches_filters(record: &MarketingRecord, filters: &Filters, query: &str) -> bool {
    if !filters.channels.is_empty() && !filters.channels.contains(&record.channel) {
        return false;
    }

    if !filters.regions.is_empty() && !filters.regions.contains(&record.region) {
        return false;
    }

    if !query.is_empty() {
        let searchable =
            format!("{} {} {}", record.channel, record.region, record.id).to_lowercase();
        if !searchable.contains(query) {
            return false;
        }
    }

    filters
        .spend_range
        .map_or(true, |range| range.contains(record.spend))
}

pub fn filter_records(data: &[MarketingRecord], filters: &Filters) -> Vec<MarketingRecord> {
    let query = filters.search_query.to_lowercase();
    data.iter()
        .filter(|record| matches_filters(record, filters, &query))
        .cloned()
        .collect()
}

/// Stable sort on `sorting.field`; `None` when no field is set, meaning the
/// input order stands.
pub fn sort_records(data: &[MarketingRecord], sorting: &SortConfig) -> Option<Vec<MarketingRecord>> {
    let field = sorting.field?;
    let mut sorted = data.to_vec();
    match sorting.direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| field.compare(a, b)),
        SortDirection::Descending => sorted.sort_by(|a, b| field.compare(b, a)),
    }
    Some(sorted)
}

/// Index range of page `page` (1-based). Page 0 and pages past the end give
/// an empty range.
pub fn page_bounds(len: usize, page: usize, page_size: usize) -> Range<usize> {
    if page == 0 || page_size == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn paginate(data: &[MarketingRecord], page: usize, page_size: usize) -> &[MarketingRecord] {
    &data[page_bounds(data.len(), page, page_size)]
}

pub const fn total_pages(total_records: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_records.div_ceil(page_size)
}

pub fn compute_metrics(data: &[MarketingRecord]) -> ComputedMetrics {
    if data.is_empty() {
        return ComputedMetrics::default();
    }

    let totals: Totals = data.iter().collect();
    let revenue = totals.conversions as f64 * 100.0;

    ComputedMetrics {
        total_spend: totals.spend,
        total_conversions: totals.conversions,
        total_impressions: totals.impressions,
        total_clicks: totals.clicks,
        overall_ctr: totals.ctr(),
        overall_cpa: totals.cpa(),
        average_roi: calculate_roi(revenue, totals.spend),
    }
}

/// Top channels by spend. Ties keep first-appearance order.
pub fn chart_data(data: &[MarketingRecord]) -> Vec<ChartDataPoint> {
    let mut points: Vec<ChartDataPoint> = accumulate_by(data, |record| record.channel.as_str())
        .into_iter()
        .map(|(name, totals)| ChartDataPoint {
            name: name.to_string(),
            spend: (totals.spend * 100.0).round() / 100.0,
            conversions: totals.conversions,
            clicks: totals.clicks,
            ctr: calculate_ctr(totals.clicks, totals.impressions),
        })
        .collect();

    points.sort_by(|a, b| b.spend.total_cmp(&a.spend));
    points.truncate(CHART_CHANNEL_LIMIT);
    points
}

pub fn unique_channels(data: &[MarketingRecord]) -> Vec<String> {
    distinct_sorted(data.iter().map(|record| record.channel.as_str()))
}

pub fn unique_regions(data: &[MarketingRecord]) -> Vec<String> {
    distinct_sorted(data.iter().map(|record| record.region.as_str()))
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
