use super::protocol::{DatasetMetadata, WorkerRequest, WorkerResponse};
use crate::domain::MarketingRecord;
use crate::store::Records;
use std::any::Any;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("preprocessing is already in progress")]
    Busy,
    #[error("no preprocessing request is in flight")]
    Idle,
    #[error("preprocess worker has been terminated")]
    Terminated,
    #[error("preprocess worker stopped unexpectedly")]
    Crashed,
    #[error("failed to start preprocess worker: {0}")]
    Spawn(#[source] io::Error),
    #[error("preprocessing failed: {0}")]
    Processing(String),
}

/// Successful round trip: the records as echoed back plus their metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedData {
    pub data: Records,
    pub metadata: DatasetMetadata,
}

/// Handle to the preprocessing thread. At most one request is in flight at
/// a time; dropping the handle shuts the thread down.
#[derive(Debug)]
pub struct PreprocessWorker {
    requests: Option<UnboundedSender<WorkerRequest>>,
    responses: UnboundedReceiver<WorkerResponse>,
    in_flight: bool,
    handle: Option<JoinHandle<()>>,
}

impl PreprocessWorker {
    pub fn spawn() -> Result<Self, WorkerError> {
        Self::spawn_with(super::process_marketing_data)
    }

    /// Starts a worker running `processor` for every request.
    pub fn spawn_with<F>(processor: F) -> Result<Self, WorkerError>
    where
        F: Fn(&[MarketingRecord]) -> DatasetMetadata + Send + 'static,
    {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<WorkerResponse>();

        let handle = std::thread::Builder::new()
            .name("preprocess-worker".to_string())
            .spawn(move || {
                while let Some(request) = request_rx.blocking_recv() {
                    let response = handle_request(&processor, request);
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                debug!("preprocess worker exiting");
            })
            .map_err(WorkerError::Spawn)?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            in_flight: false,
            handle: Some(handle),
        })
    }

    pub const fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub const fn is_terminated(&self) -> bool {
        self.requests.is_none()
    }

    pub fn submit(&mut self, data: Records) -> Result<(), WorkerError> {
        let Some(requests) = &self.requests else {
            return Err(WorkerError::Terminated);
        };
        if self.in_flight {
            return Err(WorkerError::Busy);
        }

        debug!(records = data.len(), "submitting dataset for preprocessing");
        requests
            .send(WorkerRequest::ProcessData { data })
            .map_err(|_| WorkerError::Crashed)?;
        self.in_flight = true;
        Ok(())
    }

    /// Waits for the in-flight response. Cancel-safe: if the future is
    /// dropped the request stays in flight and a later call receives it.
    pub async fn recv(&mut self) -> Result<ProcessedData, WorkerError> {
        if self.is_terminated() {
            return Err(WorkerError::Terminated);
        }
        if !self.in_flight {
            return Err(WorkerError::Idle);
        }

        let response = self.responses.recv().await;
        self.in_flight = false;
        response.map_or(Err(WorkerError::Crashed), into_result)
    }

    /// Non-blocking poll for the render loop. `None` while nothing is ready.
    pub fn try_recv(&mut self) -> Option<Result<ProcessedData, WorkerError>> {
        if !self.in_flight || self.is_terminated() {
            return None;
        }

        match self.responses.try_recv() {
            Ok(response) => {
                self.in_flight = false;
                Some(into_result(response))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = false;
                Some(Err(WorkerError::Crashed))
            }
        }
    }

    pub async fn process(&mut self, data: Records) -> Result<ProcessedData, WorkerError> {
        self.submit(data)?;
        self.recv().await
    }

    /// Stops the worker. Responses still in the channel are discarded.
    pub fn terminate(&mut self) {
        if self.requests.take().is_none() {
            return;
        }
        self.responses.close();

        // An idle worker exits as soon as its request channel closes; a busy
        // one is left to finish on its own.
        if let Some(handle) = self.handle.take() {
            if !self.in_flight && handle.join().is_err() {
                warn!("preprocess worker panicked during shutdown");
            }
        }
        self.in_flight = false;
        debug!("preprocess worker terminated");
    }
}

impl Drop for PreprocessWorker {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn handle_request<F>(processor: &F, request: WorkerRequest) -> WorkerResponse
where
    F: Fn(&[MarketingRecord]) -> DatasetMetadata,
{
    let WorkerRequest::ProcessData { data } = request;
    let started = Instant::now();

    match catch_unwind(AssertUnwindSafe(|| processor(&data))) {
        Ok(metadata) => {
            debug!(
                records = metadata.total_records,
                channels = metadata.unique_channels.len(),
                regions = metadata.unique_regions.len(),
                elapsed_ms = started.elapsed().as_millis(),
                "dataset preprocessed"
            );
            WorkerResponse::DataProcessed { data, metadata }
        }
        Err(payload) => {
            let error = panic_message(payload.as_ref());
            warn!(%error, "preprocessing panicked");
            WorkerResponse::Error { error }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic in preprocess worker".to_string())
}

fn into_result(response: WorkerResponse) -> Result<ProcessedData, WorkerError> {
    match response {
        WorkerResponse::DataProcessed { data, metadata } => Ok(ProcessedData { data, metadata }),
        WorkerResponse::Error { error } => Err(WorkerError::Processing(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::process_marketing_data;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn records(count: u64) -> Records {
        (0..count)
            .map(|id| MarketingRecord {
                id,
                channel: ["Search", "Social", "Email"][(id % 3) as usize].to_string(),
                region: ["US", "EU"][(id % 2) as usize].to_string(),
                spend: id as f64 * 1.5,
                impressions: 100,
                clicks: 5,
                conversions: 1,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[tokio::test]
    async fn round_trip_matches_in_process_pass() {
        let mut worker = PreprocessWorker::spawn().unwrap();
        let data = records(25);

        let processed = worker.process(Arc::clone(&data)).await.unwrap();
        assert_eq!(processed.metadata, process_marketing_data(&data));
        assert_eq!(processed.data, data);
        assert!(!worker.is_busy());
    }

    #[tokio::test]
    async fn second_submit_while_busy_is_rejected() {
        let mut worker = PreprocessWorker::spawn().unwrap();
        worker.submit(records(3)).unwrap();

        assert!(matches!(worker.submit(records(3)), Err(WorkerError::Busy)));
        assert!(worker.recv().await.is_ok());
        assert!(matches!(worker.recv().await, Err(WorkerError::Idle)));
    }

    #[tokio::test]
    async fn panicking_pass_becomes_processing_error() {
        let mut worker = PreprocessWorker::spawn_with(|_| panic!("bad record")).unwrap();

        match worker.process(records(1)).await {
            Err(WorkerError::Processing(message)) => assert_eq!(message, "bad record"),
            other => panic!("unexpected result: {other:?}"),
        }

        // The worker survives a failed pass.
        assert!(worker.process(records(2)).await.is_err());
        assert!(!worker.is_busy());
    }

    #[tokio::test]
    async fn terminated_worker_accepts_nothing() {
        let mut worker = PreprocessWorker::spawn().unwrap();
        worker.terminate();

        assert!(worker.is_terminated());
        assert!(matches!(worker.submit(records(1)), Err(WorkerError::Terminated)));
        assert!(matches!(worker.recv().await, Err(WorkerError::Terminated)));
        assert!(worker.try_recv().is_none());
    }

    #[tokio::test]
    async fn cancelled_receive_keeps_response_for_next_call() {
        let mut worker = PreprocessWorker::spawn_with(|data| {
            std::thread::sleep(Duration::from_millis(50));
            process_marketing_data(data)
        })
        .unwrap();
        worker.submit(records(4)).unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(1), worker.recv()).await;
        assert!(timed_out.is_err());
        assert!(worker.is_busy());

        let processed = worker.recv().await.unwrap();
        assert_eq!(processed.metadata.total_records, 4);
    }

    #[test]
    fn try_recv_polls_without_blocking() {
        let mut worker = PreprocessWorker::spawn().unwrap();
        assert!(worker.try_recv().is_none());

        worker.submit(records(6)).unwrap();
        let started = Instant::now();
        let result = loop {
            if let Some(result) = worker.try_recv() {
                break result;
            }
            assert!(started.elapsed() < Duration::from_secs(5), "worker never answered");
            std::thread::sleep(Duration::from_millis(1));
        };

        assert_eq!(result.unwrap().metadata.total_records, 6);
        assert!(worker.try_recv().is_none());
    }

    #[test]
    fn vanished_worker_thread_reports_crash() {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<WorkerResponse>();
        let handle = std::thread::spawn(move || {
            let _request = request_rx.blocking_recv();
            drop(response_tx);
        });
        let mut worker = PreprocessWorker {
            requests: Some(request_tx),
            responses: response_rx,
            in_flight: false,
            handle: None,
        };

        worker.submit(records(2)).unwrap();
        handle.join().unwrap();

        assert!(matches!(worker.try_recv(), Some(Err(WorkerError::Crashed))));
        assert!(!worker.is_busy());
        assert!(worker.try_recv().is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn worker_metadata_equals_sync_pass(
            spends in prop::collection::vec(0_u32..10_000, 0..40),
        ) {
            let data: Records = spends
                .iter()
                .enumerate()
                .map(|(index, spend)| MarketingRecord {
                    id: index as u64,
                    channel: format!("C{}", index % 4),
                    region: format!("R{}", index % 3),
                    spend: f64::from(*spend) / 100.0,
                    impressions: 0,
                    clicks: 0,
                    conversions: 0,
                })
                .collect::<Vec<_>>()
                .into();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let mut worker = PreprocessWorker::spawn().unwrap();
            let processed = runtime.block_on(worker.process(Arc::clone(&data))).unwrap();
            prop_assert_eq!(processed.metadata, process_marketing_data(&data));
        }
    }
}
