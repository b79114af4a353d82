//! Download UIS bulk data (BDDS) archives and work with their tables.
//!
//! A [`Session`] resolves a dataset name to its archive URL through a
//! [`CatalogResolver`], then loads the archive into a [`TableMapping`]. The
//! free functions in [`subset`], [`merge`] and [`search`] operate on those
//! tables and always return new ones.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod output;
pub mod search;
pub mod session;
pub mod subset;
pub mod table;

pub use archive::{LoadedArchive, TableMapping};
pub use catalog::{CatalogResolver, RemoteCatalog, StaticCatalog};
pub use domain::{DatasetId, GeoMode, SearchKind};
pub use error::{ErrorKind, UisError};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};
pub use merge::{
    add_labels, add_metadata, add_metadata_as, all_label_merge, all_meta_merge, full_subset,
    metadata_categories,
};
pub use search::search;
pub use session::Session;
pub use subset::subset;
pub use table::{Table, Value};

/// Distinct non-null values of `column`, sorted ascending.
pub fn unique_values(table: &Table, column: &str) -> Result<Vec<Value>, UisError> {
    table.unique_values(column)
}
