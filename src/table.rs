use std::fmt;
use std::io::{Cursor, Write};

use polars::prelude::*;
use tracing::debug;

use crate::domain::{COUNTRY_ID, INDICATOR_ID, METADATA, REGION_ID, TYPE};
use crate::error::UisError;

/// Identifier and free-text columns. They are read as text and never
/// narrowed to numbers, so codes like `0010` keep their leading zeros.
pub const TEXT_COLUMNS: [&str; 5] = [INDICATOR_ID, COUNTRY_ID, REGION_ID, TYPE, METADATA];

const ROW_INDEX: &str = "__uisdata_row";

/// A single cell read back from a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical text of the cell. Integral floats render without a
    /// fractional part so `2015.0` and `2015` give the same key.
    pub fn key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Int(value) => Some(value.to_string()),
            Value::Float(value) => Some(match integral(*value) {
                Some(int) => int.to_string(),
                None => value.to_string(),
            }),
            Value::Text(value) => Some(value.clone()),
        }
    }

    pub fn as_year(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Float(value) => integral(*value),
            Value::Text(value) => value.trim().parse().ok(),
            Value::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<AnyValue<'_>> for Value {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Value::Null,
            AnyValue::Int32(value) => Value::Int(value.into()),
            AnyValue::Int64(value) => Value::Int(value),
            AnyValue::UInt32(value) => Value::Int(value.into()),
            AnyValue::Float32(value) => Value::Float(value.into()),
            AnyValue::Float64(value) => Value::Float(value),
            AnyValue::String(value) => Value::Text(value.to_string()),
            AnyValue::StringOwned(value) => Value::Text(value.to_string()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}

fn frame_err(err: PolarsError) -> UisError {
    UisError::Frame(err.to_string())
}

/// Narrows a text column to Int64, then Float64, when every non-null cell
/// parses. All-null columns stay text.
fn narrow(column: &Column) -> Column {
    let series = column.as_materialized_series().rechunk();
    if series.null_count() == series.len() {
        return column.clone();
    }
    [DataType::Int64, DataType::Float64]
        .iter()
        .find_map(|dtype| series.strict_cast(dtype).ok())
        .map(Column::from)
        .unwrap_or_else(|| column.clone())
}

fn values_to_column(name: &str, cells: &[Value]) -> Column {
    let name = PlSmallStr::from(name);
    let present = cells.iter().filter(|cell| !cell.is_null()).collect::<Vec<_>>();
    let series = if !present.is_empty() && present.iter().all(|cell| matches!(cell, Value::Int(_))) {
        let ints = cells
            .iter()
            .map(|cell| match cell {
                Value::Int(value) => Some(*value),
                _ => None,
            })
            .collect::<Vec<Option<i64>>>();
        Series::new(name, ints)
    } else if !present.is_empty()
        && present
            .iter()
            .all(|cell| matches!(cell, Value::Int(_) | Value::Float(_)))
    {
        let floats = cells
            .iter()
            .map(|cell| match cell {
                Value::Int(value) => Some(*value as f64),
                Value::Float(value) => Some(*value),
                _ => None,
            })
            .collect::<Vec<Option<f64>>>();
        Series::new(name, floats)
    } else {
        let texts = cells
            .iter()
            .map(|cell| (!cell.is_null()).then(|| cell.to_string()))
            .collect::<Vec<Option<String>>>();
        Series::new(name, texts)
    };
    Column::from(series)
}

/// In-memory table backed by a polars [`DataFrame`]. Every operation returns
/// a new table.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

impl Table {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Builds a table from cell values. Short rows are padded with nulls.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Result<Self, UisError> {
        let columns = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells = rows
                    .iter()
                    .map(|row| row.get(idx).cloned().unwrap_or(Value::Null))
                    .collect::<Vec<_>>();
                values_to_column(name, &cells)
            })
            .collect::<Vec<_>>();
        DataFrame::new(columns).map(Self::new).map_err(frame_err)
    }

    /// Parses comma-separated text with a header row. Missing trailing fields
    /// become nulls and surplus fields are truncated. [`TEXT_COLUMNS`] stay
    /// text; other columns are narrowed to integers or floats when every
    /// cell allows it.
    pub fn from_csv_str(name: &str, text: &str) -> Result<Self, UisError> {
        let csv_err = |message: String| UisError::Csv {
            table: name.to_string(),
            message,
        };
        if text.trim().is_empty() {
            return Err(csv_err("missing header row".to_string()));
        }

        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|options| options.with_truncate_ragged_lines(true))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()
            .map_err(|err| csv_err(err.to_string()))?;

        let columns = raw
            .get_columns()
            .iter()
            .map(|column| {
                if TEXT_COLUMNS.contains(&column.name().as_str()) {
                    column.clone()
                } else {
                    narrow(column)
                }
            })
            .collect::<Vec<_>>();
        let frame = DataFrame::new(columns).map_err(|err| csv_err(err.to_string()))?;
        debug!(table = name, rows = frame.height(), columns = frame.width(), "parsed table");
        Ok(Self::new(frame))
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.frame.get_column_index(name)
    }

    pub fn require(&self, name: &str) -> Result<&Column, UisError> {
        self.frame.column(name).map_err(|_| UisError::MissingColumn {
            column: name.to_string(),
        })
    }

    pub fn column(&self, name: &str) -> Result<Vec<Value>, UisError> {
        Ok(self
            .require(name)?
            .as_materialized_series()
            .rechunk()
            .iter()
            .map(Value::from)
            .collect())
    }

    /// Cells of a column rendered as text; nulls stay `None`.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>, UisError> {
        let text = self
            .require(name)?
            .as_materialized_series()
            .cast(&DataType::String)
            .map_err(frame_err)?;
        Ok(text
            .str()
            .map_err(frame_err)?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<Value> {
        let column = self.frame.column(column).ok()?;
        column.as_materialized_series().get(row).ok().map(Value::from)
    }

    pub fn row(&self, row: usize) -> Option<Vec<Value>> {
        (row < self.len()).then(|| {
            self.frame
                .get_columns()
                .iter()
                .map(|column| {
                    column
                        .as_materialized_series()
                        .get(row)
                        .map(Value::from)
                        .unwrap_or(Value::Null)
                })
                .collect()
        })
    }

    /// Rows for which `predicate` is true; null counts as false.
    pub fn filter(&self, predicate: Expr) -> Result<Table, UisError> {
        self.frame
            .clone()
            .lazy()
            .filter(predicate)
            .collect()
            .map(Table::new)
            .map_err(frame_err)
    }

    /// Left join on the `on` columns. Every left row is kept in order; a row
    /// with several matches is repeated once per match. Null keys never
    /// match. Non-key columns present on both sides are renamed with `_x`
    /// (left) and `_y` (right) suffixes. Right key columns are cast to the
    /// left key types first.
    pub fn left_join(&self, right: &Table, on: &[&str]) -> Result<Table, UisError> {
        let mut key_casts = Vec::with_capacity(on.len());
        for key in on {
            let dtype = self.require(key)?.dtype().clone();
            right.require(key)?;
            key_casts.push(col(*key).cast(dtype));
        }

        let mut left_frame = self.frame.clone();
        let mut right_frame = right.frame.clone();
        let overlap = right
            .columns()
            .into_iter()
            .filter(|name| !on.contains(&name.as_str()) && self.column_index(name).is_some())
            .collect::<Vec<_>>();
        for name in &overlap {
            left_frame
                .rename(name, format!("{name}_x").into())
                .map_err(frame_err)?;
            right_frame
                .rename(name, format!("{name}_y").into())
                .map_err(frame_err)?;
        }

        let keys = on.iter().map(|key| col(*key)).collect::<Vec<_>>();
        let joined = left_frame
            .lazy()
            .with_row_index(ROW_INDEX, None)
            .join(
                right_frame.lazy().with_columns(key_casts),
                keys.clone(),
                keys,
                JoinArgs::new(JoinType::Left),
            )
            .sort([ROW_INDEX], SortMultipleOptions::default().with_maintain_order(true))
            .collect()
            .and_then(|frame| frame.drop(ROW_INDEX))
            .map_err(frame_err)?;
        debug!(
            left = self.len(),
            right = right.len(),
            rows = joined.height(),
            suffixed = overlap.len(),
            "left join"
        );
        Ok(Table::new(joined))
    }

    /// Groups rows by `by` and joins the `column` values of each group with
    /// `separator`, in table order. Groups appear in order of first
    /// occurrence. Rows with a null key or a null value are skipped.
    pub fn group_concat(&self, by: &[&str], column: &str, separator: &str) -> Result<Table, UisError> {
        for key in by {
            self.require(key)?;
        }
        self.require(column)?;

        let present = by
            .iter()
            .map(|key| col(*key).is_not_null())
            .fold(col(column).is_not_null(), |acc, expr| acc.and(expr));
        let keys = by.iter().map(|key| col(*key)).collect::<Vec<_>>();
        self.frame
            .clone()
            .lazy()
            .filter(present)
            .group_by_stable(keys)
            .agg([col(column).cast(DataType::String).str().join(separator, true)])
            .collect()
            .map(Table::new)
            .map_err(frame_err)
    }

    /// Distinct non-null values of a column, sorted ascending.
    pub fn unique_values(&self, column: &str) -> Result<Vec<Value>, UisError> {
        let unique = self
            .require(column)?
            .as_materialized_series()
            .drop_nulls()
            .unique()
            .and_then(|series| series.sort(SortOptions::default()))
            .map_err(frame_err)?;
        Ok(unique.iter().map(Value::from).collect())
    }

    pub fn rename_column(&self, from: &str, to: &str) -> Result<Table, UisError> {
        self.require(from)?;
        if from == to {
            return Ok(self.clone());
        }
        let mut frame = self.frame.clone();
        frame.rename(from, to.into()).map_err(frame_err)?;
        Ok(Table::new(frame))
    }

    pub fn drop_column(&self, name: &str) -> Result<Table, UisError> {
        self.require(name)?;
        self.frame.drop(name).map(Table::new).map_err(frame_err)
    }

    /// Writes the table as CSV with a header row; nulls become empty fields.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), UisError> {
        let mut frame = self.frame.clone();
        CsvWriter::new(&mut writer)
            .include_header(true)
            .finish(&mut frame)
            .map_err(|err| UisError::Io(err.to_string()))?;
        writer.flush().map_err(|err| UisError::Io(err.to_string()))
    }
}
