use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::domain::{DatasetId, GeoMode};
use crate::error::UisError;
use crate::fetch::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_CONFIG_FILE: &str = "uisdata.json";
pub const CATALOG_URL_ENV: &str = "UISDATA_CATALOG_URL";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub catalog_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub subsets: Vec<SubsetEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SubsetEntry {
    Shorthand(String),
    Detailed(SubsetEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubsetEntryObject {
    pub dataset: String,
    #[serde(default)]
    pub years: Vec<i64>,
    #[serde(default)]
    pub geos: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub geo_mode: Option<GeoMode>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// What to do with one dataset. `filter` is `None` for shorthand entries,
/// which only load the archive and summarise its tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetRequest {
    pub dataset: DatasetId,
    pub filter: Option<SubsetFilter>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsetFilter {
    pub years: Vec<i64>,
    pub geos: Vec<String>,
    pub indicators: Vec<String>,
    pub geo_mode: GeoMode,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub catalog_url: String,
    pub timeout: Duration,
    pub subsets: Vec<SubsetRequest>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            subsets: Vec::new(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads the config at `path`, or `uisdata.json` in the current directory.
    /// A missing default file yields the defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, UisError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let mut resolved = if path.is_none() && !config_path.exists() {
            ResolvedConfig::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|err| UisError::Io(format!("{}: {err}", config_path.display())))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|err| UisError::Config(err.to_string()))?;
            Self::resolve_config(config)?
        };

        if let Ok(url) = std::env::var(CATALOG_URL_ENV) {
            if !url.trim().is_empty() {
                resolved.catalog_url = url.trim().to_string();
            }
        }
        Ok(resolved)
    }

    /// Like [`ConfigLoader::resolve`] but fails when no config file exists.
    pub fn require(path: Option<&str>) -> Result<ResolvedConfig, UisError> {
        if path.is_none() && !PathBuf::from(DEFAULT_CONFIG_FILE).exists() {
            return Err(UisError::MissingConfig);
        }
        Self::resolve(path)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, UisError> {
        let subsets = config
            .subsets
            .into_iter()
            .map(|entry| match entry {
                SubsetEntry::Shorthand(value) => Ok(SubsetRequest {
                    dataset: value.parse()?,
                    filter: None,
                    output: None,
                }),
                SubsetEntry::Detailed(obj) => Ok(SubsetRequest {
                    dataset: obj.dataset.parse()?,
                    filter: Some(SubsetFilter {
                        years: obj.years,
                        geos: obj.geos,
                        indicators: obj.indicators,
                        geo_mode: obj.geo_mode.unwrap_or_default(),
                    }),
                    output: obj.output,
                }),
            })
            .collect::<Result<Vec<_>, UisError>>()?;

        Ok(ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            catalog_url: config
                .catalog_url
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            subsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_config_shorthand() {
        let config = Config {
            schema_version: None,
            catalog_url: None,
            timeout_secs: None,
            subsets: vec![SubsetEntry::Shorthand("sdg".to_string())],
        };

        let resolved = ConfigLoader::resolve_config(config).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(resolved.subsets[0].dataset, DatasetId::Sdg);
        assert!(resolved.subsets[0].filter.is_none());
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        let config = Config {
            schema_version: None,
            catalog_url: None,
            timeout_secs: None,
            subsets: vec![SubsetEntry::Shorthand("NOPE".to_string())],
        };
        let err = ConfigLoader::resolve_config(config).unwrap_err();
        assert_matches!(err, UisError::UnknownDataset(_));
    }
}
