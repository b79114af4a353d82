use tracing::info;

use crate::archive::{self, LoadedArchive, TableMapping};
use crate::catalog::CatalogResolver;
use crate::domain::DatasetId;
use crate::error::UisError;
use crate::fetch::Fetcher;

#[derive(Debug, Clone)]
pub enum SessionState {
    Unloaded,
    Loaded(LoadedArchive),
}

/// One dataset, its resolved archive URL and, once loaded, its archive.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: DatasetId,
    url: String,
    state: SessionState,
}

impl Session {
    pub fn new<C: CatalogResolver + ?Sized>(
        dataset: DatasetId,
        catalog: &C,
    ) -> Result<Self, UisError> {
        let url = catalog.resolve(dataset)?;
        Ok(Self::with_url(dataset, url))
    }

    pub fn with_url(dataset: DatasetId, url: impl Into<String>) -> Self {
        Self {
            dataset,
            url: url.into(),
            state: SessionState::Unloaded,
        }
    }

    pub fn dataset(&self) -> DatasetId {
        self.dataset
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    /// Downloads and unpacks the archive. A loaded session is returned as is;
    /// a failed load leaves the session unloaded.
    pub fn load<F: Fetcher + ?Sized>(&mut self, fetcher: &F) -> Result<&LoadedArchive, UisError> {
        if let SessionState::Unloaded = self.state {
            info!(dataset = %self.dataset, url = %self.url, "loading archive");
            let loaded = archive::load(fetcher, &self.url, self.dataset.name_prefix_len())?;
            self.state = SessionState::Loaded(loaded);
        }
        self.archive()
    }

    pub fn archive(&self) -> Result<&LoadedArchive, UisError> {
        match &self.state {
            SessionState::Loaded(loaded) => Ok(loaded),
            SessionState::Unloaded => Err(UisError::NotReady("archive access")),
        }
    }

    pub fn tables(&self) -> Result<&TableMapping, UisError> {
        self.archive().map(LoadedArchive::tables)
    }

    pub fn readme(&self) -> Result<String, UisError> {
        match &self.state {
            SessionState::Loaded(loaded) => loaded.readme(),
            SessionState::Unloaded => Err(UisError::NotReady("readme")),
        }
    }
}
