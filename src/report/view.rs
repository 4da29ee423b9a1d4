//! The shapes handed across the presentation boundary: a row-and-column
//! table payload and chart specifications. The reactive surface renders
//! these; nothing here knows how.

use polars::prelude::*;
use serde::Serialize;

use crate::dataset::{schema, SchemaError};
use crate::report::correlation::CorrelationMatrix;
use crate::report::error::ReportError;
use crate::report::pipeline::ReportPipeline;
use crate::selection::{AnalysisFocus, Selection, SelectionError, Tab};
use crate::types::Pollutant;

/// What one interaction renders: at most one table and any number of charts.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ViewModel {
    pub table: Option<TablePayload>,
    pub charts: Vec<ChartSpec>,
}

/// A materialized table for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl TablePayload {
    pub fn from_frame(frame: &DataFrame) -> Result<Self, SchemaError> {
        let columns: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            let mut row = Vec::with_capacity(frame.width());
            for column in frame.get_columns() {
                row.push(CellValue::from_any(column.as_materialized_series().get(idx)?));
            }
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }
}

impl CellValue {
    fn from_any(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => CellValue::Null,
            AnyValue::Int8(v) => CellValue::Int(v as i64),
            AnyValue::Int16(v) => CellValue::Int(v as i64),
            AnyValue::Int32(v) => CellValue::Int(v as i64),
            AnyValue::Int64(v) => CellValue::Int(v),
            AnyValue::UInt8(v) => CellValue::Int(v as i64),
            AnyValue::UInt16(v) => CellValue::Int(v as i64),
            AnyValue::UInt32(v) => CellValue::Int(v as i64),
            AnyValue::UInt64(v) => CellValue::Int(v as i64),
            AnyValue::Float32(v) => CellValue::Float(v as f64),
            AnyValue::Float64(v) => CellValue::Float(v),
            AnyValue::String(v) => CellValue::Str(v.to_string()),
            AnyValue::StringOwned(v) => CellValue::Str(v.to_string()),
            other => CellValue::Str(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Line,
    Scatter,
    Heatmap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One plotted series. Points are pairwise-complete: rows where either
/// coordinate is missing are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapData {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Everything the surface needs to draw one figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<HeatmapData>,
}

impl ChartSpec {
    pub fn line(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
        series: Series,
    ) -> Self {
        Self {
            kind: ChartKind::Line,
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            series: vec![series],
            matrix: None,
        }
    }

    pub fn scatter(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
        series: Series,
    ) -> Self {
        Self {
            kind: ChartKind::Scatter,
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            series: vec![series],
            matrix: None,
        }
    }

    pub fn heatmap(title: impl Into<String>, matrix: &CorrelationMatrix) -> Self {
        Self {
            kind: ChartKind::Heatmap,
            title: title.into(),
            x_title: String::new(),
            y_title: String::new(),
            series: Vec::new(),
            matrix: Some(HeatmapData {
                labels: matrix.labels().to_vec(),
                values: matrix.values().to_vec(),
            }),
        }
    }
}

impl ReportPipeline<'_> {
    /// The request handler: one selection in, one view model out, matched
    /// exhaustively over the closed tab enumeration. Invoked once per
    /// interaction; nothing is retained between calls.
    pub fn render(&self, selection: &Selection) -> Result<ViewModel, ReportError> {
        match selection.tab {
            Tab::Overview => self.overview_view(selection.station.as_deref()),
            Tab::Analytics(AnalysisFocus::Trends) => {
                self.trends_view(selection.station.as_deref())
            }
            Tab::Analytics(AnalysisFocus::Hourly) => self.hourly_view(),
            Tab::Analytics(AnalysisFocus::Correlations) => self.correlations_view(),
            Tab::Analytics(AnalysisFocus::RainImpact) => self.rain_impact_view(),
            // Narrative only; the surface owns its static text.
            Tab::Conclusion => Ok(ViewModel::default()),
        }
    }

    /// Falls back to the first station in the domain when none is selected,
    /// the way the surface's selectbox defaults.
    fn selected_station<'s>(&'s self, station: Option<&'s str>) -> Result<&'s str, SelectionError> {
        match station {
            Some(station) => Ok(station),
            None => self
                .dataset()
                .stations()
                .first()
                .map(String::as_str)
                .ok_or(SelectionError::NoStationAvailable),
        }
    }

    fn overview_view(&self, station: Option<&str>) -> Result<ViewModel, ReportError> {
        let station = self.selected_station(station)?;
        let preview = self.preview_table(station)?;
        Ok(ViewModel {
            table: Some(TablePayload::from_frame(&preview)?),
            charts: Vec::new(),
        })
    }

    fn trends_view(&self, station: Option<&str>) -> Result<ViewModel, ReportError> {
        let trend = self.yearly_trend(&Pollutant::ALL)?;
        let charts = trend_charts(&trend, schema::YEAR, "Year", |p| format!("Trend of {p}"))?;

        let station = self.selected_station(station)?;
        let by_station = self.yearly_trend_by_station(station, &Pollutant::ALL)?;
        Ok(ViewModel {
            table: Some(TablePayload::from_frame(&by_station)?),
            charts,
        })
    }

    fn hourly_view(&self) -> Result<ViewModel, ReportError> {
        let trend = self.hourly_trend(&Pollutant::ALL)?;
        let charts = trend_charts(&trend, schema::HOUR, "Hour", |p| {
            format!("Trend of {p} per Hour")
        })?;
        Ok(ViewModel {
            table: None,
            charts,
        })
    }

    fn correlations_view(&self) -> Result<ViewModel, ReportError> {
        let matrix = self.pollutant_correlation()?;
        Ok(ViewModel {
            table: None,
            charts: vec![ChartSpec::heatmap("Correlation Heatmap of Pollutants", &matrix)],
        })
    }

    fn rain_impact_view(&self) -> Result<ViewModel, ReportError> {
        let matrix = self.rainfall_correlation()?;
        let mut charts = vec![ChartSpec::heatmap(
            "Correlation Heatmap: Rainfall and Pollutants",
            &matrix,
        )];
        for pollutant in [Pollutant::Pm25, Pollutant::Pm10] {
            charts.push(self.rain_scatter(pollutant)?);
        }
        Ok(ViewModel {
            table: None,
            charts,
        })
    }

    fn rain_scatter(&self, pollutant: Pollutant) -> Result<ChartSpec, ReportError> {
        let frame = self.dataset().frame();
        let rain = schema::numeric_values(frame, schema::RAIN)?;
        let values = schema::numeric_values(frame, pollutant.column_name())?;
        let points = rain
            .iter()
            .zip(values.iter())
            .filter_map(|(x, y)| {
                Some(Point {
                    x: (*x)?,
                    y: (*y)?,
                })
            })
            .collect();
        Ok(ChartSpec::scatter(
            format!("Rainfall vs {pollutant}"),
            "Rainfall (mm)",
            format!("{pollutant} (µg/m³)"),
            Series {
                name: pollutant.to_string(),
                color: None,
                points,
            },
        ))
    }
}

/// One line chart per pollutant from an aggregated trend frame, rows with a
/// null mean skipped.
fn trend_charts(
    trend: &DataFrame,
    key: &str,
    x_title: &str,
    title: impl Fn(&Pollutant) -> String,
) -> Result<Vec<ChartSpec>, SchemaError> {
    let keys = schema::numeric_values(trend, key)?;
    let mut charts = Vec::with_capacity(Pollutant::ALL.len());
    for pollutant in &Pollutant::ALL {
        let means = schema::numeric_values(trend, pollutant.column_name())?;
        let points = keys
            .iter()
            .zip(means.iter())
            .filter_map(|(x, y)| {
                Some(Point {
                    x: (*x)?,
                    y: (*y)?,
                })
            })
            .collect();
        charts.push(ChartSpec::line(
            title(pollutant),
            x_title,
            format!("Average Concentration ({pollutant})"),
            Series {
                name: pollutant.to_string(),
                color: None,
                points,
            },
        ));
    }
    Ok(charts)
}
