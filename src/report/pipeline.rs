use log::debug;
use polars::prelude::*;

use crate::dataset::{schema, Dataset, SchemaError};
use crate::report::correlation::CorrelationMatrix;
use crate::report::error::ReportError;
use crate::selection::SelectionError;
use crate::types::Pollutant;

/// Rows a preview table is capped at.
pub const PREVIEW_ROWS: usize = 5;

/// Maps filter parameters to display tables and correlation grids.
///
/// Borrows the loaded [`Dataset`]; every operation is a pure function of the
/// table and its arguments, recomputed per request with nothing cached in
/// between, so identical calls yield bit-identical results.
pub struct ReportPipeline<'a> {
    dataset: &'a Dataset,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub(crate) fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// First [`PREVIEW_ROWS`] rows recorded for `station`, with the
    /// identifying and time columns stripped and the remaining column order
    /// untouched. A station with fewer rows returns what it has.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidSelection`] when `station` is not part of the
    /// dataset's station domain.
    pub fn preview_table(&self, station: &str) -> Result<DataFrame, ReportError> {
        self.require_station(station)?;

        let filtered = self
            .dataset
            .frame()
            .clone()
            .lazy()
            .filter(col(schema::STATION).eq(lit(station)))
            .limit(PREVIEW_ROWS as IdxSize)
            .collect()
            .map_err(SchemaError::from)?;

        let kept: Vec<&str> = filtered
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .filter(|name| !schema::PREVIEW_EXCLUDED.contains(name))
            .collect();
        Ok(filtered.select(kept).map_err(SchemaError::from)?)
    }

    /// Mean of each requested pollutant per calendar year, nulls skipped,
    /// one row per distinct year in ascending order.
    pub fn yearly_trend(&self, pollutants: &[Pollutant]) -> Result<DataFrame, ReportError> {
        self.grouped_means(schema::YEAR, None, pollutants)
    }

    /// As [`ReportPipeline::yearly_trend`], restricted to one station. The
    /// station column does not appear in the result.
    pub fn yearly_trend_by_station(
        &self,
        station: &str,
        pollutants: &[Pollutant],
    ) -> Result<DataFrame, ReportError> {
        self.require_station(station)?;
        self.grouped_means(schema::YEAR, Some(station), pollutants)
    }

    /// Mean of each requested pollutant per hour of day, across all years
    /// and stations. Exactly the hours present, ascending.
    pub fn hourly_trend(&self, pollutants: &[Pollutant]) -> Result<DataFrame, ReportError> {
        self.grouped_means(schema::HOUR, None, pollutants)
    }

    /// Pairwise-complete Pearson correlation between every pair of the named
    /// numeric columns, in request order.
    pub fn correlation_matrix(&self, columns: &[&str]) -> Result<CorrelationMatrix, ReportError> {
        let frame = self.dataset.frame();
        let mut extracted = Vec::with_capacity(columns.len());
        for name in columns {
            extracted.push(schema::numeric_values(frame, name)?);
        }
        let labels = columns.iter().map(|c| c.to_string()).collect();
        debug!("correlating {} columns over {} rows", columns.len(), frame.height());
        Ok(CorrelationMatrix::compute(labels, &extracted))
    }

    /// Correlation among the six pollutants.
    pub fn pollutant_correlation(&self) -> Result<CorrelationMatrix, ReportError> {
        let columns: Vec<&str> = Pollutant::ALL.iter().map(|p| p.column_name()).collect();
        self.correlation_matrix(&columns)
    }

    /// Correlation of rainfall against every pollutant.
    pub fn rainfall_correlation(&self) -> Result<CorrelationMatrix, ReportError> {
        let mut columns = vec![schema::RAIN];
        columns.extend(Pollutant::ALL.iter().map(|p| p.column_name()));
        self.correlation_matrix(&columns)
    }

    fn grouped_means(
        &self,
        key: &str,
        station: Option<&str>,
        pollutants: &[Pollutant],
    ) -> Result<DataFrame, ReportError> {
        let frame = self.dataset.frame();
        schema::require_numeric(frame, key)?;
        for pollutant in pollutants {
            schema::require_numeric(frame, pollutant.column_name())?;
        }

        let mut lazy = frame.clone().lazy();
        if let Some(station) = station {
            lazy = lazy.filter(col(schema::STATION).eq(lit(station)));
        }
        let means: Vec<Expr> = pollutants
            .iter()
            .map(|p| col(p.column_name()).mean())
            .collect();
        let grouped = lazy
            .group_by([col(key)])
            .agg(means)
            .sort([key], Default::default())
            .collect()
            .map_err(SchemaError::from)?;

        debug!("aggregated {} groups by {}", grouped.height(), key);
        Ok(grouped)
    }

    fn require_station(&self, station: &str) -> Result<(), SelectionError> {
        if self.dataset.contains_station(station) {
            Ok(())
        } else {
            Err(SelectionError::UnknownStation(station.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Dataset {
        let frame = df!(
            schema::ROW_INDEX => [1i64, 2, 3, 4, 5, 6, 7],
            schema::YEAR => [2013i64, 2013, 2014, 2014, 2013, 2013, 2014],
            schema::MONTH => [3i64, 3, 3, 3, 3, 3, 3],
            schema::DAY => [1i64, 1, 2, 2, 3, 3, 4],
            schema::HOUR => [0i64, 1, 0, 1, 2, 0, 1],
            "PM2.5" => [Some(10.0f64), Some(20.0), Some(40.0), None, Some(30.0), Some(100.0), Some(60.0)],
            "PM10" => [Some(20.0f64), None, Some(40.0), Some(60.0), Some(10.0), Some(200.0), Some(80.0)],
            "SO2" => [4.0f64, 4.0, 3.0, 5.0, 4.0, 9.0, 3.0],
            "NO2" => [7.0f64, 7.0, 5.0, 6.0, 8.0, 20.0, 4.0],
            "CO" => [300.0f64, 300.0, 200.0, 250.0, 280.0, 700.0, 150.0],
            "O3" => [77.0f64, 77.0, 60.0, 65.0, 70.0, 30.0, 90.0],
            schema::TEMPERATURE => [-0.7f64, -1.1, -0.5, 0.2, 1.0, -2.0, 3.0],
            schema::PRESSURE => [1023.0f64, 1023.2, 1020.0, 1019.5, 1021.0, 1025.0, 1018.0],
            schema::DEW_POINT => [-18.8f64, -18.2, -17.0, -16.5, -15.0, -20.0, -12.0],
            schema::RAIN => [Some(0.0f64), Some(0.5), None, Some(1.0), Some(0.0), Some(2.0), Some(0.0)],
            schema::WIND_DIRECTION => ["NNW", "N", "NE", "E", "SE", "NW", "S"],
            schema::WIND_SPEED => [4.4f64, 4.7, 2.0, 1.5, 3.0, 5.0, 2.5],
            schema::STATION => ["Aotizhongxin", "Aotizhongxin", "Aotizhongxin", "Aotizhongxin", "Aotizhongxin", "Changping", "Changping"],
            schema::DATETIME => [
                "2013-03-01 00:00:00", "2013-03-01 01:00:00", "2014-03-02 00:00:00",
                "2014-03-02 01:00:00", "2013-03-03 02:00:00", "2013-03-03 00:00:00",
                "2014-03-04 01:00:00",
            ],
        )
        .unwrap();
        Dataset::from_frame(frame).unwrap()
    }

    fn means(frame: &DataFrame, name: &str) -> Vec<Option<f64>> {
        frame.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn preview_caps_rows_and_strips_identifying_columns() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let preview = pipeline.preview_table("Aotizhongxin").unwrap();
        assert_eq!(preview.height(), 5);

        let columns: Vec<&str> = preview
            .get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(
            columns,
            [
                "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES", "DEWP", "RAIN", "wd",
                "WSPM"
            ]
        );

        // Values pass through unmodified.
        assert_eq!(preview.column("PM2.5").unwrap().f64().unwrap().get(0), Some(10.0));
    }

    #[test]
    fn preview_of_a_short_station_returns_all_its_rows() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let preview = pipeline.preview_table("Changping").unwrap();
        assert_eq!(preview.height(), 2);
    }

    #[test]
    fn preview_rejects_unknown_station() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let err = pipeline.preview_table("Atlantis").unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidSelection(SelectionError::UnknownStation(ref s)) if s == "Atlantis"
        ));
    }

    #[test]
    fn yearly_trend_averages_per_year_ascending() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let trend = pipeline.yearly_trend(&[Pollutant::Pm25]).unwrap();
        let years: Vec<Option<i64>> = trend
            .column(schema::YEAR)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, [Some(2013), Some(2014)]);
        // 2013: (10 + 20 + 30 + 100) / 4, 2014: (40 + 60) / 2; the null row
        // is skipped.
        assert_eq!(means(&trend, "PM2.5"), [Some(40.0), Some(50.0)]);
    }

    #[test]
    fn yearly_trend_matches_worked_example() {
        let frame = df!(
            schema::STATION => ["X", "X", "X"],
            schema::YEAR => [2013i64, 2013, 2014],
            "PM2.5" => [10.0f64, 20.0, 30.0],
        )
        .unwrap();
        let dataset = Dataset::from_frame(frame).unwrap();
        let pipeline = ReportPipeline::new(&dataset);

        let trend = pipeline.yearly_trend(&[Pollutant::Pm25]).unwrap();
        assert_eq!(means(&trend, "PM2.5"), [Some(15.0), Some(30.0)]);
    }

    #[test]
    fn yearly_trend_by_station_filters_first() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let trend = pipeline
            .yearly_trend_by_station("Aotizhongxin", &[Pollutant::Pm25])
            .unwrap();
        // 2013: (10 + 20 + 30) / 3, 2014: 40 with the null skipped.
        assert_eq!(means(&trend, "PM2.5"), [Some(20.0), Some(40.0)]);
        assert!(trend.column(schema::STATION).is_err());

        let err = pipeline
            .yearly_trend_by_station("Atlantis", &[Pollutant::Pm25])
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidSelection(_)));
    }

    #[test]
    fn hourly_trend_groups_by_hour_of_day() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let trend = pipeline.hourly_trend(&[Pollutant::Pm25]).unwrap();
        let hours: Vec<Option<i64>> = trend
            .column(schema::HOUR)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(hours, [Some(0), Some(1), Some(2)]);
        // h0: (10 + 40 + 100) / 3, h1: (20 + 60) / 2, h2: 30.
        assert_eq!(means(&trend, "PM2.5"), [Some(50.0), Some(40.0), Some(30.0)]);
    }

    #[test]
    fn missing_pollutant_column_is_a_schema_violation() {
        let frame = df!(
            schema::STATION => ["X"],
            schema::YEAR => [2013i64],
            "PM2.5" => [10.0f64],
        )
        .unwrap();
        let dataset = Dataset::from_frame(frame).unwrap();
        let pipeline = ReportPipeline::new(&dataset);

        let err = pipeline.yearly_trend(&[Pollutant::O3]).unwrap_err();
        assert!(matches!(
            err,
            ReportError::SchemaViolation(SchemaError::MissingColumn(ref c)) if c == "O3"
        ));
    }

    #[test]
    fn non_numeric_pollutant_column_is_a_schema_violation() {
        let frame = df!(
            schema::STATION => ["X", "X"],
            schema::YEAR => [2013i64, 2014],
            "PM2.5" => ["low", "high"],
        )
        .unwrap();
        let dataset = Dataset::from_frame(frame).unwrap();
        let pipeline = ReportPipeline::new(&dataset);

        let err = pipeline.yearly_trend(&[Pollutant::Pm25]).unwrap_err();
        assert!(matches!(
            err,
            ReportError::SchemaViolation(SchemaError::NonNumericColumn { ref column, .. })
                if column == "PM2.5"
        ));
    }

    #[test]
    fn correlation_uses_request_order_and_matches_by_hand() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let matrix = pipeline.rainfall_correlation().unwrap();
        assert_eq!(matrix.labels()[0], schema::RAIN);
        assert_eq!(matrix.len(), 7);
        assert!((matrix.get(0, 0).unwrap() - 1.0).abs() < 1e-12);

        let pollutants = pipeline.pollutant_correlation().unwrap();
        assert_eq!(
            pollutants.labels(),
            ["PM2.5", "PM10", "SO2", "NO2", "CO", "O3"]
        );
    }

    #[test]
    fn aggregations_are_idempotent() {
        let dataset = fixture();
        let pipeline = ReportPipeline::new(&dataset);

        let first = pipeline.yearly_trend(&Pollutant::ALL).unwrap();
        let second = pipeline.yearly_trend(&Pollutant::ALL).unwrap();
        assert!(first.equals_missing(&second));

        let m1 = pipeline.pollutant_correlation().unwrap();
        let m2 = pipeline.pollutant_correlation().unwrap();
        assert_eq!(m1, m2);
    }

    #[test]
    fn empty_dataset_yields_empty_trend() {
        let frame = df!(
            schema::STATION => Vec::<String>::new(),
            schema::YEAR => Vec::<i64>::new(),
            "PM2.5" => Vec::<f64>::new(),
        )
        .unwrap();
        let dataset = Dataset::from_frame(frame).unwrap();
        let pipeline = ReportPipeline::new(&dataset);

        let trend = pipeline.yearly_trend(&[Pollutant::Pm25]).unwrap();
        assert_eq!(trend.height(), 0);
    }
}
