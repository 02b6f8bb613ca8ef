// Library half of the dashboard: data model, store, pipeline, preprocessing
// worker and presentation model. The binary adds the terminal UI on top.
pub mod calculations;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod preprocess;
pub mod presentation;
pub mod session;
pub mod store;

pub use domain::{MarketingRecord, SortDirection, SortField};
pub use error::DashboardError;
