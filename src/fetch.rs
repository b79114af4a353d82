use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::UisError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Retrieves the body of a URL as bytes.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, UisError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, UisError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, UisError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("uisdata/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| UisError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| UisError::Http(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, UisError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| UisError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(UisError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .map_err(|err| UisError::Http(err.to_string()))?;
        debug!(url, bytes = bytes.len(), "fetched");
        Ok(bytes.to_vec())
    }
}

/// Serves fixed bodies keyed by URL. Unknown URLs answer with a 404.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, UisError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| UisError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}
