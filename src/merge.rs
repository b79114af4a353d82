use polars::prelude::*;
use tracing::debug;

use crate::archive::TableMapping;
use crate::domain::{
    COUNTRY_ID, COUNTRY_TABLE, GeoMode, INDICATOR_ID, LABEL_TABLE, METADATA, METADATA_TABLE, TYPE,
    YEAR,
};
use crate::error::UisError;
use crate::subset::subset;
use crate::table::Table;

pub const METADATA_SEPARATOR: &str = " | ";

const METADATA_KEYS: [&str; 3] = [YEAR, COUNTRY_ID, INDICATOR_ID];

/// Joins the metadata texts of one category onto `table`.
///
/// Texts sharing (YEAR, COUNTRY_ID, INDICATOR_ID, TYPE) are concatenated with
/// `" | "` in table order, then left-joined on (YEAR, COUNTRY_ID,
/// INDICATOR_ID). The result gains TYPE and METADATA columns, null where no
/// metadata exists, and keeps every row of `table` in order.
pub fn add_metadata(table: &Table, metadata: &Table, category: &str) -> Result<Table, UisError> {
    let grouped = grouped_metadata(table, metadata, category)?;
    table.left_join(&grouped, &METADATA_KEYS)
}

/// Like [`add_metadata`], but writes the concatenated text to `column` and
/// leaves out TYPE, so several categories can be joined side by side.
/// `column` must not be one of the join keys.
pub fn add_metadata_as(
    table: &Table,
    metadata: &Table,
    category: &str,
    column: &str,
) -> Result<Table, UisError> {
    if METADATA_KEYS.contains(&column) {
        return Err(UisError::ColumnConflict {
            column: column.to_string(),
        });
    }
    let grouped = grouped_metadata(table, metadata, category)?
        .drop_column(TYPE)?
        .rename_column(METADATA, column)?;
    table.left_join(&grouped, &METADATA_KEYS)
}

fn grouped_metadata(table: &Table, metadata: &Table, category: &str) -> Result<Table, UisError> {
    for column in METADATA_KEYS {
        table.require(column)?;
        metadata.require(column)?;
    }
    metadata.require(TYPE)?;
    metadata.require(METADATA)?;

    let restricted = metadata.filter(col(TYPE).cast(DataType::String).eq(lit(category)))?;
    let grouped = restricted.group_concat(
        &[YEAR, COUNTRY_ID, INDICATOR_ID, TYPE],
        METADATA,
        METADATA_SEPARATOR,
    )?;
    debug!(category, rows = restricted.len(), groups = grouped.len(), "grouped metadata");
    Ok(grouped)
}

/// Left-joins a label table onto `table` by `key`. Label tables are expected
/// to be unique on `key`; duplicates repeat the matching rows.
pub fn add_labels(table: &Table, labels: &Table, key: &str) -> Result<Table, UisError> {
    table.left_join(labels, &[key])
}

/// Country labels then indicator labels in country mode; indicator labels
/// only in region mode.
pub fn all_label_merge(tables: &TableMapping, table: &Table, mode: GeoMode) -> Result<Table, UisError> {
    match mode {
        GeoMode::Country => {
            let with_countries = add_labels(table, tables.get(COUNTRY_TABLE)?, COUNTRY_ID)?;
            add_labels(&with_countries, tables.get(LABEL_TABLE)?, INDICATOR_ID)
        }
        GeoMode::Region => add_labels(table, tables.get(LABEL_TABLE)?, INDICATOR_ID),
    }
}

/// Distinct metadata categories of the archive, sorted ascending.
pub fn metadata_categories(tables: &TableMapping) -> Result<Vec<String>, UisError> {
    Ok(tables
        .get(METADATA_TABLE)?
        .unique_values(TYPE)?
        .iter()
        .filter_map(|value| value.key())
        .collect())
}

/// Column that receives the texts of `category` in [`all_meta_merge`].
pub fn category_column(category: &str) -> String {
    if METADATA_KEYS.contains(&category) {
        format!("{METADATA}_{category}")
    } else {
        category.to_string()
    }
}

/// Joins every metadata category onto `table`, one column per category named
/// by [`category_column`].
pub fn all_meta_merge(tables: &TableMapping, table: &Table) -> Result<Table, UisError> {
    let metadata = tables.get(METADATA_TABLE)?;
    metadata_categories(tables)?
        .iter()
        .try_fold(table.clone(), |acc, category| {
            add_metadata_as(&acc, metadata, category, &category_column(category))
        })
}

/// Subset of the national or regional data with labels and, for national
/// data, every metadata category joined.
pub fn full_subset<G: AsRef<str>, I: AsRef<str>>(
    tables: &TableMapping,
    years: &[i64],
    geos: &[G],
    indicators: &[I],
    mode: GeoMode,
) -> Result<Table, UisError> {
    let data = tables.get(mode.data_table())?;
    let selected = subset(data, years, geos, indicators, mode)?;
    let labelled = all_label_merge(tables, &selected, mode)?;
    match mode {
        GeoMode::Country => all_meta_merge(tables, &labelled),
        GeoMode::Region => Ok(labelled),
    }
}
