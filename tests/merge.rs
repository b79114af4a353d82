mod common;

use assert_matches::assert_matches;

use uisdata::archive::{LoadedArchive, TableMapping};
use uisdata::domain::{COUNTRY_ID, GeoMode, INDICATOR_ID, METADATA, TYPE, YEAR};
use uisdata::error::UisError;
use uisdata::merge::{
    add_labels, add_metadata, add_metadata_as, all_label_merge, all_meta_merge, full_subset,
    metadata_categories,
};
use uisdata::table::{Table, Value};

const SOURCE: &str = "Source:Data sources";
const COVERAGE: &str = "Under Coverage:Students or individuals";

fn tables() -> TableMapping {
    LoadedArchive::from_bytes(common::sdg_archive(), 4)
        .unwrap()
        .into_tables()
}

fn national() -> Table {
    tables().get("DATA_NATIONAL").unwrap().clone()
}

#[test]
fn metadata_texts_are_pipe_joined() {
    let tables = tables();
    let result = add_metadata(&national(), tables.get("METADATA").unwrap(), SOURCE).unwrap();

    assert_eq!(result.len(), national().len());
    assert_eq!(
        result.value(0, METADATA),
        Some(Value::text("UIS questionnaire | National census"))
    );
    assert_eq!(result.value(0, TYPE), Some(Value::text(SOURCE)));
    assert_eq!(
        result.value(3, METADATA),
        Some(Value::text("UN Population Division"))
    );
    assert_eq!(result.value(1, METADATA), Some(Value::Null));
    assert_eq!(result.value(1, TYPE), Some(Value::Null));
}

#[test]
fn unknown_category_keeps_every_row() {
    let tables = tables();
    let data = national();
    let result = add_metadata(&data, tables.get("METADATA").unwrap(), "Nothing").unwrap();
    assert_eq!(result.len(), data.len());
    assert!(result.column(METADATA).unwrap().iter().all(|v| v.is_null()));
    for row in 0..data.len() {
        let joined = result.row(row).unwrap();
        assert_eq!(joined[..data.width()], data.row(row).unwrap()[..]);
    }
}

#[test]
fn second_join_with_default_names_is_suffixed() {
    let tables = tables();
    let metadata = tables.get("METADATA").unwrap();
    let once = add_metadata(&national(), metadata, SOURCE).unwrap();
    let twice = add_metadata(&once, metadata, COVERAGE).unwrap();
    assert!(twice.column_index("METADATA_x").is_some());
    assert!(twice.column_index("METADATA_y").is_some());
    assert_eq!(
        twice.value(0, "METADATA_y"),
        Some(Value::text("Excludes private schools"))
    );
}

#[test]
fn metadata_requires_key_columns() {
    let tables = tables();
    let regional = tables.get("DATA_REGIONAL").unwrap();
    let err = add_metadata(regional, tables.get("METADATA").unwrap(), SOURCE).unwrap_err();
    assert_matches!(err, UisError::MissingColumn { column } if column == COUNTRY_ID);
}

#[test]
fn labels_preserve_order_and_count() {
    let tables = tables();
    let data = national();
    let result = add_labels(&data, tables.get("LABEL").unwrap(), INDICATOR_ID).unwrap();
    assert_eq!(result.len(), data.len());
    let before = data.column(INDICATOR_ID).unwrap();
    let after = result.column(INDICATOR_ID).unwrap();
    assert_eq!(before, after);
    assert_eq!(
        result.value(0, "INDICATOR_LABEL_EN"),
        Some(Value::text("Gross enrolment ratio, primary"))
    );
}

#[test]
fn duplicate_label_keys_repeat_rows() {
    let data = Table::from_rows(&[INDICATOR_ID], vec![vec!["GER.1".into()]]).unwrap();
    let labels = Table::from_rows(
        &[INDICATOR_ID, "LABEL"],
        vec![vec!["GER.1".into(), "a".into()], vec!["GER.1".into(), "b".into()]],
    )
    .unwrap();
    assert_eq!(add_labels(&data, &labels, INDICATOR_ID).unwrap().len(), 2);
}

#[test]
fn all_label_merge_by_mode() {
    let tables = tables();
    let country = all_label_merge(&tables, &national(), GeoMode::Country).unwrap();
    assert!(country.column_index("COUNTRY_NAME_EN").is_some());
    assert!(country.column_index("INDICATOR_LABEL_EN").is_some());
    assert_eq!(country.value(1, "COUNTRY_NAME_EN"), Some(Value::text("Kuwait")));

    let regional = tables.get("DATA_REGIONAL").unwrap();
    let region = all_label_merge(&tables, regional, GeoMode::Region).unwrap();
    assert!(region.column_index("COUNTRY_NAME_EN").is_none());
    assert!(region.column_index("INDICATOR_LABEL_EN").is_some());
}

#[test]
fn categories_are_discovered_sorted() {
    assert_eq!(metadata_categories(&tables()).unwrap(), vec![SOURCE, COVERAGE]);
}

#[test]
fn all_meta_merge_adds_one_column_per_category() {
    let tables = tables();
    let data = national();
    let result = all_meta_merge(&tables, &data).unwrap();
    assert_eq!(result.len(), data.len());
    assert_eq!(result.width(), data.width() + 2);
    assert_eq!(
        result.value(0, SOURCE),
        Some(Value::text("UIS questionnaire | National census"))
    );
    assert_eq!(
        result.value(0, COVERAGE),
        Some(Value::text("Excludes private schools"))
    );
}

#[test]
fn fold_order_does_not_change_values() {
    let tables = tables();
    let metadata = tables.get("METADATA").unwrap();
    let data = national();
    let forward = add_metadata_as(&data, metadata, SOURCE, SOURCE)
        .and_then(|t| add_metadata_as(&t, metadata, COVERAGE, COVERAGE))
        .unwrap();
    let backward = add_metadata_as(&data, metadata, COVERAGE, COVERAGE)
        .and_then(|t| add_metadata_as(&t, metadata, SOURCE, SOURCE))
        .unwrap();
    assert_eq!(forward.len(), backward.len());
    for row in 0..forward.len() {
        for column in [YEAR, COUNTRY_ID, INDICATOR_ID, SOURCE, COVERAGE] {
            assert_eq!(forward.value(row, column), backward.value(row, column));
        }
    }
}

#[test]
fn full_subset_country() {
    let result = full_subset(
        &tables(),
        &[2015],
        &["ARG"],
        &["GER.1", "SAP.1"],
        GeoMode::Country,
    )
    .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.value(0, "COUNTRY_NAME_EN"), Some(Value::text("Argentina")));
    assert_eq!(
        result.value(1, SOURCE),
        Some(Value::text("UN Population Division"))
    );
    assert_eq!(result.value(1, COVERAGE), Some(Value::Null));
}

#[test]
fn full_subset_region_skips_metadata() {
    let result = full_subset(
        &tables(),
        &[2015],
        &["WB: World", "SDG: Africa"],
        &["GER.1"],
        GeoMode::Region,
    )
    .unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.column_index(SOURCE).is_none());
    assert!(result.column_index("INDICATOR_LABEL_EN").is_some());
}
