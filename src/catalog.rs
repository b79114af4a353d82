use std::collections::HashMap;

use tracing::info;

use crate::domain::DatasetId;
use crate::error::UisError;
use crate::fetch::Fetcher;
use crate::table::Table;

/// Public list mapping each BDDS dataset name to its archive URL.
pub const DEFAULT_CATALOG_URL: &str = "https://apimgmtstzgjpfeq2u763lag.blob.core.windows.net/content/MediaLibrary/python/BDDS_DatasetList_Name-URL.csv";

pub trait CatalogResolver {
    fn resolve(&self, dataset: DatasetId) -> Result<String, UisError>;
}

/// Resolves dataset names through the remote `dataset,url` list.
pub struct RemoteCatalog<F: Fetcher> {
    fetcher: F,
    catalog_url: String,
}

impl<F: Fetcher> RemoteCatalog<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_url(fetcher, DEFAULT_CATALOG_URL)
    }

    pub fn with_url(fetcher: F, catalog_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            catalog_url: catalog_url.into(),
        }
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    pub fn entries(&self) -> Result<HashMap<String, String>, UisError> {
        let bytes = self.fetcher.fetch(&self.catalog_url)?;
        let text = String::from_utf8(bytes).map_err(|_| {
            UisError::Catalog(format!("{} is not UTF-8 text", self.catalog_url))
        })?;
        parse_catalog(&text)
    }
}

impl<F: Fetcher> CatalogResolver for RemoteCatalog<F> {
    fn resolve(&self, dataset: DatasetId) -> Result<String, UisError> {
        let url = self
            .entries()?
            .remove(dataset.as_str())
            .ok_or_else(|| UisError::UnknownDataset(dataset.to_string()))?;
        info!(%dataset, %url, "resolved archive");
        Ok(url)
    }
}

/// Fixed dataset → URL mapping, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    urls: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dataset: DatasetId, url: impl Into<String>) -> Self {
        self.urls.insert(dataset.as_str().to_string(), url.into());
        self
    }
}

impl CatalogResolver for StaticCatalog {
    fn resolve(&self, dataset: DatasetId) -> Result<String, UisError> {
        self.urls
            .get(dataset.as_str())
            .cloned()
            .ok_or_else(|| UisError::UnknownDataset(dataset.to_string()))
    }
}

/// Parses the catalog CSV. Rows with an empty name or URL are skipped; a
/// repeated name keeps its last URL. A body that is not a `dataset,url` table
/// is a [`UisError::Catalog`].
pub fn parse_catalog(text: &str) -> Result<HashMap<String, String>, UisError> {
    let text = text.trim_start_matches('\u{feff}');
    let table = Table::from_csv_str("catalog", text)
        .map_err(|err| UisError::Catalog(err.to_string()))?;
    let datasets = table
        .text_values("dataset")
        .map_err(|_| UisError::Catalog("missing column dataset".to_string()))?;
    let urls = table
        .text_values("url")
        .map_err(|_| UisError::Catalog("missing column url".to_string()))?;

    let mut entries = HashMap::new();
    for (dataset, url) in datasets.into_iter().zip(urls) {
        if let (Some(dataset), Some(url)) = (dataset, url) {
            let (dataset, url) = (dataset.trim(), url.trim());
            if !dataset.is_empty() && !url.is_empty() {
                entries.insert(dataset.to_string(), url.to_string());
            }
        }
    }
    Ok(entries)
}
