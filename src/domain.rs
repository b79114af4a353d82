use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::UisError;

pub const YEAR: &str = "YEAR";
pub const COUNTRY_ID: &str = "COUNTRY_ID";
pub const REGION_ID: &str = "REGION_ID";
pub const INDICATOR_ID: &str = "INDICATOR_ID";
pub const TYPE: &str = "TYPE";
pub const METADATA: &str = "METADATA";

pub const DATA_NATIONAL: &str = "DATA_NATIONAL";
pub const DATA_REGIONAL: &str = "DATA_REGIONAL";
pub const METADATA_TABLE: &str = "METADATA";
pub const COUNTRY_TABLE: &str = "COUNTRY";
pub const LABEL_TABLE: &str = "LABEL";
pub const REGION_TABLE: &str = "REGION";

/// BDDS archives published by the UNESCO Institute for Statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DatasetId {
    Sdg,
    Opri,
    Sci,
    Inno,
    Clte,
    Cltt,
    Film,
    Sdg11,
    Dem,
    Edu,
}

impl DatasetId {
    pub const ALL: [DatasetId; 10] = [
        DatasetId::Sdg,
        DatasetId::Opri,
        DatasetId::Sci,
        DatasetId::Inno,
        DatasetId::Clte,
        DatasetId::Cltt,
        DatasetId::Film,
        DatasetId::Sdg11,
        DatasetId::Dem,
        DatasetId::Edu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetId::Sdg => "SDG",
            DatasetId::Opri => "OPRI",
            DatasetId::Sci => "SCI",
            DatasetId::Inno => "INNO",
            DatasetId::Clte => "CLTE",
            DatasetId::Cltt => "CLTT",
            DatasetId::Film => "FILM",
            DatasetId::Sdg11 => "SDG11",
            DatasetId::Dem => "DEM",
            DatasetId::Edu => "EDU",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DatasetId::Sdg => "SDG 1 & 4",
            DatasetId::Opri => "Other Policy Relevant Indicators",
            DatasetId::Sci => "Research and development",
            DatasetId::Inno => "Innovation",
            DatasetId::Clte => "Cultural employment",
            DatasetId::Cltt => "Cultural trade",
            DatasetId::Film => "Feature films",
            DatasetId::Sdg11 => "SDG 11",
            DatasetId::Dem => "Demographic and socio-economic",
            DatasetId::Edu => "Non-core education archive",
        }
    }

    /// Length of the `<NAME>_` prefix carried by every member of the archive.
    pub fn name_prefix_len(&self) -> usize {
        self.as_str().len() + 1
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetId {
    type Err = UisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        DatasetId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| UisError::UnknownDataset(value.to_string()))
    }
}

impl TryFrom<String> for DatasetId {
    type Error = UisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatasetId> for String {
    fn from(value: DatasetId) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GeoMode {
    #[default]
    Country,
    Region,
}

impl GeoMode {
    pub fn key_column(&self) -> &'static str {
        match self {
            GeoMode::Country => COUNTRY_ID,
            GeoMode::Region => REGION_ID,
        }
    }

    pub fn data_table(&self) -> &'static str {
        match self {
            GeoMode::Country => DATA_NATIONAL,
            GeoMode::Region => DATA_REGIONAL,
        }
    }
}

impl fmt::Display for GeoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoMode::Country => write!(f, "country"),
            GeoMode::Region => write!(f, "region"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Indicator,
    Region,
}

impl SearchKind {
    /// Table and column holding the identifiers searched for this kind.
    pub fn source(&self) -> (&'static str, &'static str) {
        match self {
            SearchKind::Indicator => (LABEL_TABLE, INDICATOR_ID),
            SearchKind::Region => (REGION_TABLE, REGION_ID),
        }
    }
}
