// Ratio helpers and keyed aggregations shared by the pipeline, the grouped
// table and the headless report. Every ratio is 0 when its denominator is 0.

use crate::domain::{MarketingRecord, SortField};
use serde::Serialize;
use std::collections::HashMap;

pub fn calculate_ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    clicks as f64 / impressions as f64 * 100.0
}

pub fn calculate_cpa(spend: f64, conversions: u64) -> f64 {
    if conversions == 0 {
        return 0.0;
    }
    spend / conversions as f64
}

/// `revenue` is approximated upstream as `conversions * 100`.
pub fn calculate_roi(revenue: f64, spend: f64) -> f64 {
    if spend == 0.0 {
        return 0.0;
    }
    (revenue - spend) / spend * 100.0
}

pub fn calculate_conversion_rate(conversions: u64, clicks: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    conversions as f64 / clicks as f64 * 100.0
}

/// Running sums for one grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub count: usize,
}

impl Totals {
    pub fn add(&mut self, record: &MarketingRecord) {
        self.spend += record.spend;
        self.impressions = self.impressions.saturating_add(record.impressions);
        self.clicks = self.clicks.saturating_add(record.clicks);
        self.conversions = self.conversions.saturating_add(record.conversions);
        self.count += 1;
    }

    pub fn ctr(&self) -> f64 {
        calculate_ctr(self.clicks, self.impressions)
    }

    pub fn cpa(&self) -> f64 {
        calculate_cpa(self.spend, self.conversions)
    }

    pub fn average_spend(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.spend / self.count as f64
    }
}

impl<'a> FromIterator<&'a MarketingRecord> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a MarketingRecord>>(iter: I) -> Self {
        let mut totals = Self::default();
        for record in iter {
            totals.add(record);
        }
        totals
    }
}

/// Accumulates totals per key in a single pass, keeping keys in
/// first-appearance order.
pub fn accumulate_by<'a, F>(data: &'a [MarketingRecord], key: F) -> Vec<(&'a str, Totals)>
where
    F: Fn(&'a MarketingRecord) -> &'a str,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Totals)> = Vec::new();

    for record in data {
        let name = key(record);
        let index = *positions.entry(name).or_insert_with(|| {
            groups.push((name, Totals::default()));
            groups.len() - 1
        });
        groups[index].1.add(record);
    }

    groups
}

/// Summary row of the channel or region breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAggregate {
    pub name: String,
    pub spend: f64,
    pub conversions: u64,
    pub clicks: u64,
    pub impressions: u64,
    pub count: usize,
    pub avg_spend: f64,
    pub ctr: f64,
    pub cpa: f64,
}

impl DimensionAggregate {
    fn from_totals(name: &str, totals: &Totals) -> Self {
        Self {
            name: name.to_string(),
            spend: totals.spend,
            conversions: totals.conversions,
            clicks: totals.clicks,
            impressions: totals.impressions,
            count: totals.count,
            avg_spend: totals.average_spend(),
            ctr: totals.ctr(),
            cpa: totals.cpa(),
        }
    }
}

pub fn aggregate_by_channel(data: &[MarketingRecord]) -> Vec<DimensionAggregate> {
    accumulate_by(data, |record| record.channel.as_str())
        .iter()
        .map(|(name, totals)| DimensionAggregate::from_totals(name, totals))
        .collect()
}

pub fn aggregate_by_region(data: &[MarketingRecord]) -> Vec<DimensionAggregate> {
    accumulate_by(data, |record| record.region.as_str())
        .iter()
        .map(|(name, totals)| DimensionAggregate::from_totals(name, totals))
        .collect()
}

/// Numeric value of `field`, or `None` for text fields.
pub fn numeric_value(record: &MarketingRecord, field: SortField) -> Option<f64> {
    match field {
        SortField::Id => Some(record.id as f64),
        SortField::Spend => Some(record.spend),
        SortField::Impressions => Some(record.impressions as f64),
        SortField::Clicks => Some(record.clicks as f64),
        SortField::Conversions => Some(record.conversions as f64),
        SortField::Channel | SortField::Region => None,
    }
}

/// Column total for a numeric field; text fields total to 0.
pub fn total_by_field(data: &[MarketingRecord], field: SortField) -> f64 {
    data.iter()
        .filter_map(|record| numeric_value(record, field))
        .sum()
}

/// The `limit` records with the highest value of a numeric field. Ties keep
/// their input order; text fields leave the input order untouched.
pub fn top_performers(
    data: &[MarketingRecord],
    field: SortField,
    limit: usize,
) -> Vec<MarketingRecord> {
    let mut ranked = data.to_vec();
    ranked.sort_by(|a, b| match (numeric_value(a, field), numeric_value(b, field)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        _ => std::cmp::Ordering::Equal,
    });
    ranked.truncate(limit);
    ranked
}

/// `[min, max]` spend of a slice, `None` when empty.
pub fn spend_range(data: &[MarketingRecord]) -> Option<(f64, f64)> {
    data.iter().fold(None, |range, record| match range {
        None => Some((record.spend, record.spend)),
        Some((min, max)) => Some((f64::min(min, record.spend), f64::max(max, record.spend))),
    })
}
