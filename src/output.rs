use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::archive::TableMapping;
use crate::error::UisError;
use crate::table::Table;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
    pub dataset: String,
    pub url: String,
    pub tables: Vec<TableSummary>,
}

impl ArchiveSummary {
    pub fn new(dataset: &str, url: &str, tables: &TableMapping) -> Self {
        Self {
            dataset: dataset.to_string(),
            url: url.to_string(),
            tables: tables
                .iter()
                .map(|(name, table)| TableSummary {
                    name: name.to_string(),
                    rows: table.len(),
                    columns: table.columns(),
                })
                .collect(),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &ArchiveSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    pub fn print_matches(matches: &[String]) -> io::Result<()> {
        Self::print_json(&matches)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_summary(summary: &ArchiveSummary) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{} ({})", summary.dataset, summary.url)?;
        for table in &summary.tables {
            writeln!(
                stdout,
                "  {:<16} {:>9} rows  {}",
                table.name,
                table.rows,
                table.columns.join(", ")
            )?;
        }
        Ok(())
    }

    pub fn print_matches(matches: &[String]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for item in matches {
            writeln!(stdout, "{item}")?;
        }
        Ok(())
    }
}

/// Writes `table` as CSV to `path`, or to stdout when `path` is `None`.
pub fn export_csv(table: &Table, path: Option<&Path>) -> Result<(), UisError> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| UisError::Io(format!("{}: {err}", path.display())))?;
            table.write_csv(BufWriter::new(file))
        }
        None => table.write_csv(io::stdout().lock()),
    }
}
