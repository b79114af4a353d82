mod common;

use assert_matches::assert_matches;

use uisdata::catalog::StaticCatalog;
use uisdata::domain::DatasetId;
use uisdata::error::{ErrorKind, UisError};
use uisdata::fetch::MemoryFetcher;
use uisdata::session::Session;

const ARCHIVE_URL: &str = "https://host/SDG.zip";

fn session() -> Session {
    let catalog = StaticCatalog::new().with(DatasetId::Sdg, ARCHIVE_URL);
    Session::new(DatasetId::Sdg, &catalog).unwrap()
}

#[test]
fn unloaded_session_is_not_ready() {
    let session = session();
    assert_eq!(session.url(), ARCHIVE_URL);
    assert!(!session.is_loaded());
    assert_matches!(session.readme(), Err(UisError::NotReady(_)));
    let err = session.tables().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);
}

#[test]
fn load_then_read() {
    let fetcher = MemoryFetcher::new().with(ARCHIVE_URL, common::sdg_archive());
    let mut session = session();
    let names = session
        .load(&fetcher)
        .unwrap()
        .tables()
        .names()
        .map(str::to_string)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["COUNTRY", "DATA_NATIONAL", "DATA_REGIONAL", "LABEL", "METADATA", "REGION"]
    );
    assert!(session.is_loaded());
    assert_eq!(session.readme().unwrap(), common::README);
}

#[test]
fn failed_load_leaves_session_unloaded() {
    let mut session = session();
    let err = session.load(&MemoryFetcher::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(!session.is_loaded());
}

#[test]
fn unknown_dataset_fails_construction() {
    let err = Session::new(DatasetId::Edu, &StaticCatalog::new()).unwrap_err();
    assert_matches!(err, UisError::UnknownDataset(_));
}
