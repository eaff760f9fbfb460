#![cfg(feature = "storage-rocksdb")]

mod common;

use assert_cmd::cargo_bin;
use common::{add, company, responses, write_requests};
use serde_json::json;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: register the company
    let first = write_requests(&[add("company", company("Acme"))]).unwrap();
    let output1 = Command::new(cargo_bin!("pos-backoffice"))
        .arg(first.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    assert_eq!(responses(&output1.stdout)[0]["code"], json!(200));

    // 2. Second run: the company is still there and its name still taken
    let second = write_requests(&[
        add(
            "unit",
            json!({"name": "plate", "companyId": 1, "status": "Active"}),
        ),
        add("company", company("Acme")),
        add("company", company("Globex")),
    ])
    .unwrap();
    let output2 = Command::new(cargo_bin!("pos-backoffice"))
        .arg(second.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());

    let lines = responses(&output2.stdout);
    assert_eq!(lines[0]["response"]["unit"]["companyId"], json!(1));
    assert_eq!(lines[1]["code"], json!(409));
    assert_eq!(lines[2]["response"]["company"]["id"], json!(2));
}
