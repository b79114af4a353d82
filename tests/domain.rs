use assert_matches::assert_matches;

use uisdata::domain::{DatasetId, GeoMode, SearchKind};
use uisdata::error::{ErrorKind, UisError};

#[test]
fn every_dataset_round_trips_through_its_name() {
    for id in DatasetId::ALL {
        let parsed: DatasetId = id.as_str().to_lowercase().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.name_prefix_len(), id.as_str().len() + 1);
    }
}

#[test]
fn unknown_dataset_name() {
    let err = "UNKNOWN".parse::<DatasetId>().unwrap_err();
    assert_matches!(err, UisError::UnknownDataset(_));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn dataset_id_serde() {
    let id: DatasetId = serde_json::from_str("\"sdg11\"").unwrap();
    assert_eq!(id, DatasetId::Sdg11);
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"SDG11\"");
    assert!(serde_json::from_str::<DatasetId>("\"XYZ\"").is_err());
}

#[test]
fn geo_mode_and_search_kind_sources() {
    assert_eq!(GeoMode::default(), GeoMode::Country);
    assert_eq!(GeoMode::Region.key_column(), "REGION_ID");
    assert_eq!(GeoMode::Country.data_table(), "DATA_NATIONAL");
    assert_eq!(SearchKind::Indicator.source(), ("LABEL", "INDICATOR_ID"));
    assert_eq!(SearchKind::Region.source(), ("REGION", "REGION_ID"));
}
