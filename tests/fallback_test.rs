mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{add, company, write_requests};
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let requests = write_requests(&[add("company", company("Acme"))]).unwrap();

    let mut cmd = Command::new(cargo_bin!("pos-backoffice"));
    cmd.arg(requests.path()).arg("--db-path").arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "Falling back to in-memory storage.",
        ));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let requests = write_requests(&[add("company", company("Acme"))]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("pos-backoffice"));
    cmd.arg(requests.path()).arg("--db-path").arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back").not());
}
