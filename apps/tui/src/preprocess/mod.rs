// Offline preprocessing: one linear pass over a freshly loaded dataset,
// run on a dedicated worker thread so the render loop never blocks on it.

pub mod protocol;
pub mod worker;

pub use protocol::{DatasetMetadata, WorkerRequest, WorkerResponse};
pub use worker::{PreprocessWorker, ProcessedData, WorkerError};

use crate::domain::MarketingRecord;
use std::collections::BTreeSet;

/// Distinct channels and regions (sorted), spend bounds and record count.
pub fn process_marketing_data(data: &[MarketingRecord]) -> DatasetMetadata {
    let mut channels = BTreeSet::new();
    let mut regions = BTreeSet::new();
    let mut spend_range: Option<(f64, f64)> = None;

    for record in data {
        channels.insert(record.channel.as_str());
        regions.insert(record.region.as_str());
        spend_range = Some(match spend_range {
            None => (record.spend, record.spend),
            Some((min, max)) => (min.min(record.spend), max.max(record.spend)),
        });
    }

    DatasetMetadata {
        total_records: data.len(),
        unique_channels: channels.into_iter().map(str::to_string).collect(),
        unique_regions: regions.into_iter().map(str::to_string).collect(),
        spend_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, channel: &str, region: &str, spend: f64) -> MarketingRecord {
        MarketingRecord {
            id,
            channel: channel.to_string(),
            region: region.to_string(),
            spend,
            impressions: 10,
            clicks: 1,
            conversions: 0,
        }
    }

    #[test]
    fn metadata_is_sorted_and_bounded() {
        let data = vec![
            record(1, "Social", "US", 40.0),
            record(2, "Email", "EU", 5.5),
            record(3, "Social", "APAC", 120.0),
        ];
        let metadata = process_marketing_data(&data);

        assert_eq!(metadata.total_records, 3);
        assert_eq!(metadata.unique_channels, vec!["Email", "Social"]);
        assert_eq!(metadata.unique_regions, vec!["APAC", "EU", "US"]);
        assert_eq!(metadata.spend_range, Some((5.5, 120.0)));
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let metadata = process_marketing_data(&[]);
        assert_eq!(metadata, DatasetMetadata::default());
        assert!(metadata.spend_range.is_none());
    }
}
