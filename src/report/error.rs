use crate::dataset::SchemaError;
use crate::selection::SelectionError;
use thiserror::Error;

/// Per-request failure surfaced to the presentation layer as a user-visible
/// message. Neither kind touches the loaded dataset, so subsequent requests
/// are unaffected.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    #[error("schema violation: {0}")]
    SchemaViolation(#[from] SchemaError),
}
