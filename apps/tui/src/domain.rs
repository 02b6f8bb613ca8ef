use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One row of the marketing performance dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub id: u64,
    pub channel: String,
    pub region: String,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

/// Record fields the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Channel,
    Region,
    Spend,
    Impressions,
    Clicks,
    Conversions,
}

impl SortField {
    pub const ALL: [Self; 7] = [
        Self::Id,
        Self::Channel,
        Self::Region,
        Self::Spend,
        Self::Impressions,
        Self::Clicks,
        Self::Conversions,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Channel => "channel",
            Self::Region => "region",
            Self::Spend => "spend",
            Self::Impressions => "impressions",
            Self::Clicks => "clicks",
            Self::Conversions => "conversions",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Id),
            1 => Some(Self::Channel),
            2 => Some(Self::Region),
            3 => Some(Self::Spend),
            4 => Some(Self::Impressions),
            5 => Some(Self::Clicks),
            6 => Some(Self::Conversions),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "channel" => Some(Self::Channel),
            "region" => Some(Self::Region),
            "spend" => Some(Self::Spend),
            "impressions" => Some(Self::Impressions),
            "clicks" => Some(Self::Clicks),
            "conversions" => Some(Self::Conversions),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Channel => "Channel",
            Self::Region => "Region",
            Self::Spend => "Spend",
            Self::Impressions => "Impressions",
            Self::Clicks => "Clicks",
            Self::Conversions => "Conversions",
        }
    }

    /// Compares two records on this field in ascending order.
    ///
    /// Text fields compare lexically, numeric fields numerically.
    pub fn compare(self, a: &MarketingRecord, b: &MarketingRecord) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Channel => a.channel.cmp(&b.channel),
            Self::Region => a.region.cmp(&b.region),
            Self::Spend => a.spend.total_cmp(&b.spend),
            Self::Impressions => a.impressions.cmp(&b.impressions),
            Self::Clicks => a.clicks.cmp(&b.clicks),
            Self::Conversions => a.conversions.cmp(&b.conversions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortConfig {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Sort config after the user picks `field`: the active field flips
    /// direction, any other field starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        match self.field {
            Some(current) if current == field => Self {
                field: Some(field),
                direction: self.direction.flipped(),
            },
            _ => Self::new(field, SortDirection::Ascending),
        }
    }
}

/// Inclusive spend bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendRange {
    pub min: f64,
    pub max: f64,
}

impl SpendRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, spend: f64) -> bool {
        self.min <= spend && spend <= self.max
    }

    /// Parses `"min-max"`, `"min..max"` or `"min max"`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (min, max) = value
            .split_once("..")
            .or_else(|| value.split_once('-'))
            .or_else(|| value.split_once(' '))?;
        let min = min.trim().parse::<f64>().ok()?;
        let max = max.trim().parse::<f64>().ok()?;
        if !min.is_finite() || !max.is_finite() || min > max {
            return None;
        }
        Some(Self::new(min, max))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    pub channels: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub search_query: String,
    pub spend_range: Option<SpendRange>,
}

impl Filters {
    /// Channels + regions selected, plus one for a non-empty search.
    pub fn active_count(&self) -> usize {
        self.channels.len() + self.regions.len() + usize::from(!self.search_query.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0 && self.spend_range.is_none()
    }

    /// Applies the fields present in `patch`, leaving the rest untouched.
    pub fn merged(&self, patch: &FiltersPatch) -> Self {
        Self {
            channels: patch
                .channels
                .clone()
                .unwrap_or_else(|| self.channels.clone()),
            regions: patch.regions.clone().unwrap_or_else(|| self.regions.clone()),
            search_query: patch
                .search_query
                .clone()
                .unwrap_or_else(|| self.search_query.clone()),
            spend_range: patch.spend_range.unwrap_or(self.spend_range),
        }
    }
}

/// Partial update for [`Filters`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FiltersPatch {
    pub channels: Option<BTreeSet<String>>,
    pub regions: Option<BTreeSet<String>>,
    pub search_query: Option<String>,
    pub spend_range: Option<Option<SpendRange>>,
}

impl FiltersPatch {
    pub fn channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: Some(channels.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: Some(regions.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn spend_range(range: Option<SpendRange>) -> Self {
        Self {
            spend_range: Some(range),
            ..Self::default()
        }
    }
}

/// Returns `selected` with `value` added if absent or removed if present.
pub fn toggle_membership(selected: &BTreeSet<String>, value: &str) -> BTreeSet<String> {
    let mut next = selected.clone();
    if !next.remove(value) {
        next.insert(value.to_string());
    }
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
            total_records: 0,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [25, 50, 100, 200];

/// Entry in the page-number strip under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Gap,
}

impl PaginationConfig {
    pub const fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub const fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based `(first, last)` record numbers shown on the current page,
    /// `(0, 0)` when the page holds nothing.
    pub fn record_span(&self) -> (usize, usize) {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size);
        if self.current_page == 0 || self.page_size == 0 || start >= self.total_records {
            return (0, 0);
        }
        let last = start.saturating_add(self.page_size).min(self.total_records);
        (start + 1, last)
    }

    /// At most seven entries, with gaps around the current page.
    pub fn page_numbers(&self) -> Vec<PageItem> {
        const MAX_VISIBLE: usize = 7;
        let total = self.total_pages;
        let current = self.current_page;

        if total <= MAX_VISIBLE {
            return (1..=total).map(PageItem::Page).collect();
        }

        let mut items = Vec::with_capacity(MAX_VISIBLE);
        if current <= 4 {
            items.extend((1..=5).map(PageItem::Page));
            items.push(PageItem::Gap);
            items.push(PageItem::Page(total));
        } else if current >= total - 3 {
            items.push(PageItem::Page(1));
            items.push(PageItem::Gap);
            items.extend((total - 4..=total).map(PageItem::Page));
        } else {
            items.push(PageItem::Page(1));
            items.push(PageItem::Gap);
            items.extend((current - 1..=current + 1).map(PageItem::Page));
            items.push(PageItem::Gap);
            items.push(PageItem::Page(total));
        }
        items
    }
}

/// Dataset-wide totals and ratios over the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedMetrics {
    pub total_spend: f64,
    pub total_conversions: u64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    #[serde(rename = "overallCTR")]
    pub overall_ctr: f64,
    #[serde(rename = "overallCPA")]
    pub overall_cpa: f64,
    #[serde(rename = "averageROI")]
    pub average_roi: f64,
}

/// One channel bucket of the performance chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub name: String,
    pub spend: f64,
    pub conversions: u64,
    pub clicks: u64,
    pub ctr: f64,
}
