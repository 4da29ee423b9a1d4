use crate::dataset::DatasetError;
use crate::report::ReportError;
use thiserror::Error;

/// Everything the crate can fail with: a dataset that would not load, or a
/// single request that could not be served.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
