use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDateTime;
use log::{info, warn};
use polars::prelude::*;

use super::error::{DatasetError, SchemaError};
use super::schema;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The measurement table, loaded exactly once and never mutated afterwards.
///
/// Holds the full frame plus the station domain (sorted, de-duplicated)
/// derived from it at load time. Everything downstream borrows this.
#[derive(Debug)]
pub struct Dataset {
    frame: DataFrame,
    stations: Vec<String>,
}

impl Dataset {
    /// Reads the dashboard CSV (header row, `NA` for missing values).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::ReadIo`] when the file cannot be opened,
    /// [`DatasetError::ReadCsv`] when parsing fails, and
    /// [`DatasetError::Schema`] when the `station` column is absent.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|e| DatasetError::ReadIo(path.to_path_buf(), e))?;

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_null_values(Some(NullValues::AllColumnsSingle("NA".into()))),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| DatasetError::ReadCsv(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| DatasetError::ReadCsv(path.to_path_buf(), e))?;

        info!("read dataset from {}", path.display());
        Self::from_frame(frame)
    }

    /// Wraps an already-built frame. Applies the same validation as
    /// [`Dataset::from_csv`]; this is the seam in-memory hosts and tests use.
    pub fn from_frame(frame: DataFrame) -> Result<Self, DatasetError> {
        let stations = station_domain(&frame)?;

        if frame.height() == 0 {
            warn!("dataset is empty; aggregations will return empty results");
        } else {
            match datetime_coverage(&frame) {
                Some((first, last)) => info!(
                    "dataset ready: {} rows, {} stations, {} to {}",
                    frame.height(),
                    stations.len(),
                    first,
                    last
                ),
                None => info!(
                    "dataset ready: {} rows, {} stations",
                    frame.height(),
                    stations.len()
                ),
            }
        }

        Ok(Self { frame, stations })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Station identifiers present in the table, sorted.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn contains_station(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s == station)
    }

    /// Datetime bounds of the table, when the combined timestamp column is
    /// present and parseable. Purely informational.
    pub fn coverage(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        datetime_coverage(&self.frame)
    }
}

fn station_domain(frame: &DataFrame) -> Result<Vec<String>, SchemaError> {
    let column = frame
        .column(schema::STATION)
        .map_err(|_| SchemaError::MissingColumn(schema::STATION.to_string()))?;
    let values = column.str()?;
    let unique: BTreeSet<&str> = values.into_iter().flatten().collect();
    Ok(unique.into_iter().map(str::to_string).collect())
}

fn datetime_coverage(frame: &DataFrame) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let values = frame.column(schema::DATETIME).ok()?.str().ok()?;
    // Timestamps are zero-padded, so lexicographic min/max is chronological.
    let first = values.into_iter().flatten().min()?;
    let last = values.into_iter().flatten().max()?;
    let parse = |s: &str| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).ok();
    Some((parse(first)?, parse(last)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn sample_csv() -> &'static str {
        "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station,datetime\n\
         1,2013,3,1,0,4.0,4.0,4.0,7.0,300.0,77.0,-0.7,1023.0,-18.8,0.0,NNW,4.4,Aotizhongxin,2013-03-01 00:00:00\n\
         2,2013,3,1,1,8.0,8.0,4.0,7.0,300.0,77.0,-1.1,1023.2,-18.2,NA,N,4.7,Aotizhongxin,2013-03-01 01:00:00\n\
         3,2014,3,1,0,6.0,NA,3.0,5.0,200.0,60.0,-0.5,1020.0,-17.0,0.1,NE,2.0,Changping,2014-03-01 00:00:00\n"
    }

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_csv_and_extracts_station_domain() {
        let file = write_csv(sample_csv());
        let dataset = Dataset::from_csv(file.path()).unwrap();

        assert_eq!(dataset.frame().height(), 3);
        assert_eq!(dataset.stations(), ["Aotizhongxin", "Changping"]);
        assert!(dataset.contains_station("Changping"));
        assert!(!dataset.contains_station("Wanliu"));
    }

    #[test]
    fn na_values_become_nulls() {
        let file = write_csv(sample_csv());
        let dataset = Dataset::from_csv(file.path()).unwrap();

        let rain = dataset.frame().column(schema::RAIN).unwrap().f64().unwrap();
        assert_eq!(rain.get(0), Some(0.0));
        assert_eq!(rain.get(1), None);

        let pm10 = dataset.frame().column("PM10").unwrap();
        assert_eq!(pm10.null_count(), 1);
    }

    #[test]
    fn coverage_parses_datetime_bounds() {
        let file = write_csv(sample_csv());
        let dataset = Dataset::from_csv(file.path()).unwrap();

        let (first, last) = dataset.coverage().unwrap();
        assert_eq!(
            first,
            NaiveDate::from_ymd_opt(2013, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            last,
            NaiveDate::from_ymd_opt(2014, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_station_column_is_a_schema_violation() {
        let file = write_csv("year,PM2.5\n2013,4.0\n");
        let err = Dataset::from_csv(file.path()).unwrap_err();
        assert!(
            matches!(err, DatasetError::Schema(SchemaError::MissingColumn(ref c)) if c == "station")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Dataset::from_csv("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DatasetError::ReadIo(..)));
    }

    #[test]
    fn empty_table_loads_with_empty_domain() {
        let frame = df!("station" => Vec::<String>::new()).unwrap();
        let dataset = Dataset::from_frame(frame).unwrap();
        assert!(dataset.stations().is_empty());
        assert!(dataset.coverage().is_none());
    }
}
