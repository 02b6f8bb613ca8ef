use crate::loader::LoadError;
use crate::preprocess::WorkerError;
use thiserror::Error;

/// Anything that can fail a dataset load.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}
