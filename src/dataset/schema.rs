//! Column names of the measurement table, and per-column access checks.
//!
//! The loaded CSV carries one row per station per hour: timestamp parts, six
//! pollutant concentrations, four meteorological readings, wind, a station
//! identifier, plus a synthetic row index and a combined timestamp string.

use polars::prelude::{Column, DataFrame, DataType};

use super::error::SchemaError;

pub const ROW_INDEX: &str = "No";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const HOUR: &str = "hour";
pub const TEMPERATURE: &str = "TEMP";
pub const PRESSURE: &str = "PRES";
pub const DEW_POINT: &str = "DEWP";
pub const RAIN: &str = "RAIN";
pub const WIND_DIRECTION: &str = "wd";
pub const WIND_SPEED: &str = "WSPM";
pub const STATION: &str = "station";
pub const DATETIME: &str = "datetime";

/// Identifying and time columns stripped from preview tables.
pub const PREVIEW_EXCLUDED: [&str; 7] = [ROW_INDEX, YEAR, MONTH, DAY, HOUR, STATION, DATETIME];

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Looks up `name` and checks it holds numbers. Failures here surface as a
/// schema violation on the request that needed the column, not at load time.
pub(crate) fn require_numeric<'f>(
    frame: &'f DataFrame,
    name: &str,
) -> Result<&'f Column, SchemaError> {
    let column = frame
        .column(name)
        .map_err(|_| SchemaError::MissingColumn(name.to_string()))?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(SchemaError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    Ok(column)
}

/// Materializes a numeric column as `f64` values, nulls preserved.
pub(crate) fn numeric_values(
    frame: &DataFrame,
    name: &str,
) -> Result<Vec<Option<f64>>, SchemaError> {
    let column = require_numeric(frame, name)?;
    let values = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}
