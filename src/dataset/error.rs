use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// A required column is missing or has the wrong shape for the operation
/// that asked for it. Local to that request; the loaded table is unaffected.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("column '{column}' must be numeric, found {dtype}")]
    NonNumericColumn { column: String, dtype: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset file '{0}'")]
    ReadIo(PathBuf, #[source] std::io::Error),

    #[error("failed to parse dataset file '{0}'")]
    ReadCsv(PathBuf, #[source] PolarsError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
