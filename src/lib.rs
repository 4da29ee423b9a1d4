//! Core pipeline behind an air-quality dashboard.
//!
//! The measurement table (one row per station per hour, twelve stations,
//! six pollutants plus meteorology) is loaded exactly once; every user
//! interaction afterwards maps a selection to a display table and a list of
//! chart specifications, recomputed from the read-only table.
//!
//! ```
//! use aqdash::{Dashboard, Pollutant};
//! use polars::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = df!(
//!     "station" => ["Wanliu", "Wanliu", "Wanliu"],
//!     "year" => [2013i64, 2013, 2014],
//!     "PM2.5" => [10.0f64, 20.0, 30.0],
//! )?;
//! let dashboard = Dashboard::from_frame(frame)?;
//!
//! let trend = dashboard.pipeline().yearly_trend(&[Pollutant::Pm25])?;
//! assert_eq!(trend.height(), 2);
//! # Ok(())
//! # }
//! ```

mod dashboard;
mod dataset;
mod error;
mod report;
mod selection;
mod types;

pub use dashboard::{Dashboard, DEFAULT_DATA_PATH};
pub use dataset::{schema, Dataset, DatasetError, SchemaError};
pub use error::DashboardError;
pub use report::{
    CellValue, ChartKind, ChartSpec, CorrelationMatrix, HeatmapData, Point, ReportError,
    ReportPipeline, Series, TablePayload, ViewModel, PREVIEW_ROWS,
};
pub use selection::{AnalysisFocus, Selection, SelectionError, Tab};
pub use types::Pollutant;
