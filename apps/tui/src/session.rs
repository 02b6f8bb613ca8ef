// One-shot load orchestration: read the document, preprocess it on the
// worker, then publish the result to the store.

use crate::error::DashboardError;
use crate::loader::load_marketing_data;
use crate::preprocess::{DatasetMetadata, PreprocessWorker};
use crate::store::{Action, Records, Store};
use std::path::Path;
use tracing::{error, info};

/// Loads `path` into `store`. On failure the store carries the error message
/// and keeps its previous records.
pub async fn load_dataset(
    store: &mut Store,
    worker: &mut PreprocessWorker,
    path: &Path,
) -> Result<DatasetMetadata, DashboardError> {
    store.dispatch(Action::SetError(None));
    store.dispatch(Action::SetLoading(true));

    match fetch_and_process(worker, path).await {
        Ok((records, metadata)) => {
            info!(
                records = metadata.total_records,
                channels = metadata.unique_channels.len(),
                regions = metadata.unique_regions.len(),
                "dataset ready"
            );
            store.dispatch(Action::SetData(records));
            Ok(metadata)
        }
        Err(err) => {
            error!(error = %err, "dataset load failed");
            store.dispatch(Action::SetError(Some(err.to_string())));
            Err(err)
        }
    }
}

async fn fetch_and_process(
    worker: &mut PreprocessWorker,
    path: &Path,
) -> Result<(Records, DatasetMetadata), DashboardError> {
    let records = load_marketing_data(path).await?;
    let processed = worker.process(records).await?;
    Ok((processed.data, processed.metadata))
}
