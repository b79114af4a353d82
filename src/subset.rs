use polars::prelude::*;
use tracing::debug;

use crate::domain::{GeoMode, INDICATOR_ID, YEAR};
use crate::error::UisError;
use crate::table::Table;

/// Rows whose YEAR, geography key and INDICATOR_ID are all listed.
///
/// Years are compared numerically, so integer, integral float and numeric
/// text cells all match. Geography and indicator codes are compared as text;
/// identifier columns are read as text, so `0010` matches `"0010"`. An empty
/// list selects nothing.
pub fn subset<G: AsRef<str>, I: AsRef<str>>(
    table: &Table,
    years: &[i64],
    geos: &[G],
    indicators: &[I],
    mode: GeoMode,
) -> Result<Table, UisError> {
    let geo_column = mode.key_column();
    table.require(YEAR)?;
    table.require(geo_column)?;
    table.require(INDICATOR_ID)?;

    let years = Series::new(
        YEAR.into(),
        years.iter().map(|year| *year as f64).collect::<Vec<f64>>(),
    );
    let geos = Series::new(
        geo_column.into(),
        geos.iter().map(|geo| geo.as_ref()).collect::<Vec<&str>>(),
    );
    let indicators = Series::new(
        INDICATOR_ID.into(),
        indicators
            .iter()
            .map(|indicator| indicator.as_ref())
            .collect::<Vec<&str>>(),
    );

    let predicate = col(YEAR)
        .cast(DataType::Float64)
        .is_in(lit(years))
        .and(col(geo_column).cast(DataType::String).is_in(lit(geos)))
        .and(col(INDICATOR_ID).cast(DataType::String).is_in(lit(indicators)));
    let result = table.filter(predicate)?;
    debug!(rows_in = table.len(), rows_out = result.len(), %mode, "subset");
    Ok(result)
}
