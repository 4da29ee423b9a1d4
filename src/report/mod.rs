mod correlation;
mod error;
mod pipeline;
mod view;

pub use correlation::CorrelationMatrix;
pub use error::ReportError;
pub use pipeline::{ReportPipeline, PREVIEW_ROWS};
pub use view::{
    CellValue, ChartKind, ChartSpec, HeatmapData, Point, Series, TablePayload, ViewModel,
};
