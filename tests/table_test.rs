//! Table projection and CSV export

use mainstay_sdk::{Page, Record, Table};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

#[test]
fn test_page_to_csv_file() {
    let page: Page = serde_json::from_value(json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {"admithub_id": "abc", "first_name": "Jane", "custom_fields": {"Major": "Biology"}},
            {"admithub_id": "def", "last_name": "Doe"}
        ]
    }))
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    page.to_table().save_csv(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "admithub_id,first_name,custom_fields,last_name\n\
         abc,Jane,\"{\"\"Major\"\":\"\"Biology\"\"}\",\n\
         def,,,Doe\n"
    );
}

#[test]
fn test_save_csv_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.csv");

    let table = Table::from_value(&json!([{"a": 1}]), "results").unwrap();
    let err = table.save_csv(&path).unwrap_err();
    assert_eq!(err.kind(), mainstay_sdk::ErrorKind::Export);
}

#[test]
fn test_empty_listing_writes_empty_header() {
    let table = Table::from_value(&json!({"results": []}), "results").unwrap();
    assert!(table.is_empty());

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().trim().is_empty());
}

proptest! {
    #[test]
    fn prop_every_row_kept_and_columns_first_seen(
        rows in prop::collection::vec(
            prop::collection::btree_map("[a-e]", any::<i64>(), 0..5),
            0..20,
        )
    ) {
        let records: Vec<Record> = rows
            .iter()
            .map(|row| record(json!(row)))
            .collect();
        let table = Table::from_records(&records);

        prop_assert_eq!(table.len(), records.len());

        let mut expected: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !expected.contains(key) {
                    expected.push(key.clone());
                }
            }
        }
        prop_assert_eq!(table.columns(), expected.as_slice());

        for (i, row) in rows.iter().enumerate() {
            prop_assert_eq!(table.rows()[i].len(), expected.len());
            for column in &expected {
                let want = row.get(column).map(|v| json!(v));
                prop_assert_eq!(table.get(i, column), want.as_ref());
            }
        }
    }
}
