use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::UisError;
use crate::fetch::Fetcher;
use crate::table::Table;

/// Tables of one archive, keyed by name without dataset prefix and extension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMapping {
    tables: BTreeMap<String, Table>,
}

impl TableMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a table and returns the one it replaced, if any.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    pub fn with(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert(name, table);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Table, UisError> {
        self.tables
            .get(name)
            .ok_or_else(|| UisError::TableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A downloaded archive: its parsed tables plus the raw bytes, kept so the
/// README can be decoded on request.
#[derive(Debug, Clone)]
pub struct LoadedArchive {
    raw: Vec<u8>,
    members: Vec<String>,
    tables: TableMapping,
}

impl LoadedArchive {
    pub fn from_bytes(raw: Vec<u8>, name_prefix_len: usize) -> Result<Self, UisError> {
        let mut tables = TableMapping::new();
        let mut members = Vec::new();
        {
            let mut archive = open(&raw)?;
            for idx in 0..archive.len() {
                let mut entry = archive
                    .by_index(idx)
                    .map_err(|err| UisError::Archive(err.to_string()))?;
                if entry.is_dir() {
                    continue;
                }
                let name = entry.name().to_string();
                members.push(name.clone());
                if is_readme(&name) {
                    debug!(member = %name, "keeping README member");
                    continue;
                }

                let text = read_text(&mut entry, &name)?;
                let key = table_key(&name, name_prefix_len)?;
                let table = Table::from_csv_str(&key, &text)?;
                if tables.insert(key.clone(), table).is_some() {
                    warn!(member = %name, table = %key, "table name collision, keeping later member");
                }
            }
        }
        info!(tables = tables.len(), members = members.len(), "loaded archive");
        Ok(Self {
            raw,
            members,
            tables,
        })
    }

    pub fn tables(&self) -> &TableMapping {
        &self.tables
    }

    pub fn into_tables(self) -> TableMapping {
        self.tables
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Text of the README member; the last one wins if several exist.
    pub fn readme(&self) -> Result<String, UisError> {
        let name = self
            .members
            .iter()
            .rev()
            .find(|name| is_readme(name))
            .ok_or(UisError::ReadmeNotFound)?;
        let mut archive = open(&self.raw)?;
        let mut entry = archive
            .by_name(name)
            .map_err(|err| UisError::Archive(err.to_string()))?;
        read_text(&mut entry, name)
    }
}

/// Downloads `url` and unpacks it into a [`LoadedArchive`].
pub fn load<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    name_prefix_len: usize,
) -> Result<LoadedArchive, UisError> {
    let raw = fetcher.fetch(url)?;
    debug!(url, bytes = raw.len(), "downloaded archive");
    LoadedArchive::from_bytes(raw, name_prefix_len)
}

pub fn is_readme(name: &str) -> bool {
    name.to_lowercase().contains("readme")
}

/// Strips the `<DATASET>_` prefix and the 4-character extension.
pub fn table_key(member: &str, name_prefix_len: usize) -> Result<String, UisError> {
    let chars = member.chars().collect::<Vec<_>>();
    if chars.len() <= name_prefix_len + 4 {
        return Err(UisError::MemberName(member.to_string()));
    }
    Ok(chars[name_prefix_len..chars.len() - 4].iter().collect())
}

fn open(raw: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, UisError> {
    ZipArchive::new(Cursor::new(raw)).map_err(|err| UisError::Archive(err.to_string()))
}

fn read_text<R: Read>(entry: &mut R, member: &str) -> Result<String, UisError> {
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|err| UisError::Archive(format!("{member}: {err}")))?;
    let text = String::from_utf8(bytes).map_err(|_| UisError::Decode {
        member: member.to_string(),
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}
