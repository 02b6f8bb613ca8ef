use crate::domain::MarketingRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Dataset-wide facts computed once per load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub total_records: usize,
    pub unique_channels: Vec<String>,
    pub unique_regions: Vec<String>,
    /// `[min, max]` spend; `None` for an empty dataset.
    pub spend_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRequest {
    ProcessData { data: Arc<[MarketingRecord]> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerResponse {
    DataProcessed {
        data: Arc<[MarketingRecord]>,
        metadata: DatasetMetadata,
    },
    Error {
        error: String,
    },
}
