//! The embedding-facing entry point: owns the loaded measurement table and
//! serves one render request per user interaction.

use std::path::Path;

use bon::bon;
use log::debug;
use polars::prelude::DataFrame;

use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::report::{ReportError, ReportPipeline, ViewModel};
use crate::selection::Selection;

/// Relative location the dashboard data ships at.
pub const DEFAULT_DATA_PATH: &str = "data/main_data.csv";

/// The dashboard core. Construct one at process start, keep it for the
/// process lifetime; the dataset inside is never mutated, so interactions
/// are pure calls on read-only state and a host may share it freely.
///
/// # Examples
///
/// ```no_run
/// use aqdash::{Dashboard, DashboardError};
///
/// fn main() -> Result<(), DashboardError> {
///     let dashboard = Dashboard::open()?;
///     let view = dashboard
///         .view()
///         .tab("Analytics")
///         .focus("Correlations")
///         .call()?;
///     println!("{} charts", view.charts.len());
///     Ok(())
/// }
/// ```
pub struct Dashboard {
    dataset: Dataset,
}

#[bon]
impl Dashboard {
    /// Loads the dataset from [`DEFAULT_DATA_PATH`].
    pub fn open() -> Result<Self, DashboardError> {
        Self::from_csv(DEFAULT_DATA_PATH)
    }

    /// Loads the dataset from a CSV at `path`. Happens exactly once; every
    /// subsequent request recomputes from the in-memory table.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        Ok(Self {
            dataset: Dataset::from_csv(path)?,
        })
    }

    /// Wraps an already-built frame, validated the same way as a CSV load.
    pub fn from_frame(frame: DataFrame) -> Result<Self, DashboardError> {
        Ok(Self {
            dataset: Dataset::from_frame(frame)?,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Borrows the typed pipeline for direct use of the individual
    /// operations (previews, trends, correlation grids).
    pub fn pipeline(&self) -> ReportPipeline<'_> {
        ReportPipeline::new(&self.dataset)
    }

    /// Renders one interaction from the raw labels the UI supplies.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.tab(&str)`: **Required.** One of `"Overview"`, `"Analytics"`,
    ///   `"Conclusion"`.
    /// * `.focus(&str)`: Optional. Analysis focus inside Analytics, one of
    ///   `"Trends"`, `"Hourly"`, `"Correlations"`, `"Rain Impact"`.
    ///   Defaults to `"Trends"`.
    /// * `.station(&str)`: Optional. Station identifier for the views that
    ///   filter by station; defaults to the first station in the domain.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidSelection`] for labels or stations outside
    /// their domains, [`ReportError::SchemaViolation`] when a column the
    /// view needs is missing or non-numeric. Both are local to this request.
    #[builder]
    pub fn view(
        &self,
        tab: &str,
        focus: Option<&str>,
        station: Option<&str>,
    ) -> Result<ViewModel, DashboardError> {
        let selection = Selection::parse(tab, focus, station).map_err(ReportError::from)?;
        debug!("rendering {:?}", selection);
        Ok(self.pipeline().render(&selection)?)
    }

    /// Renders a typed selection directly.
    pub fn render(&self, selection: &Selection) -> Result<ViewModel, DashboardError> {
        Ok(self.pipeline().render(selection)?)
    }
}
