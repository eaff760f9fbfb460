mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{add, branch, company, employee, position, responses, table, write_requests};
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("pos-backoffice"));
    cmd.arg("tests/fixtures/session.jsonl");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""message":"Data saved successfully.""#))
        .stdout(predicate::str::contains(r#""code":409"#))
        .stdout(predicate::str::contains(
            r#""message":"No expenses found with companyId : 1""#,
        ))
        .stdout(predicate::str::contains(
            r#""message":"No branch found with id : 7""#,
        ));

    Ok(())
}

#[test]
fn test_table_service_session() -> Result<(), Box<dyn std::error::Error>> {
    let requests = write_requests(&[
        add("company", company("Acme")),
        add("branch", branch("Main", "BR01", 1)),
        add("position", position("Waiter", 1)),
        add("employee", employee("ann", 1, 1, 1)),
        add("table", table("A1", 1, 1)),
        add("table", table("A2", 1, 1)),
        add(
            "transaction",
            json!({"tableId": 2, "peoples": 3, "expiration": 90, "branchId": 1, "employeeId": 1}),
        ),
        add(
            "transaction",
            json!({"tableId": 2, "peoples": 2, "expiration": 60, "branchId": 1, "employeeId": 1}),
        ),
        json!({"op": "list", "resource": "transaction", "by": "branchId", "id": 1}),
        json!({"op": "close", "resource": "transaction", "id": 1}),
        json!({"op": "get", "resource": "transaction", "id": 2}),
    ])?;

    let output = Command::new(cargo_bin!("pos-backoffice"))
        .arg(requests.path())
        .output()?;
    assert!(output.status.success());

    let lines = responses(&output.stdout);
    assert_eq!(lines.len(), 11);
    assert!(lines[..7].iter().all(|line| line["code"] == json!(200)));

    let opened = &lines[6]["response"]["transaction"];
    assert_eq!(opened["receipt"], json!("BR01000001"));
    assert_eq!(opened["totalPrice"], json!("0"));
    assert_eq!(lines[7]["code"], json!(409));

    let tables = lines[8]["response"]["transaction"].as_array().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0]["index"], json!(1));
    assert!(tables[0]["transactionOrder"].is_null());
    assert_eq!(tables[1]["transactionOrder"]["receipt"], json!("BR01000001"));

    assert_eq!(lines[9]["response"]["transaction"]["status"], json!("InActive"));
    assert!(lines[10]["response"]["transaction"]["transactionOrder"].is_null());

    Ok(())
}

#[test]
fn test_malformed_lines_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mut requests = write_requests(&[add("company", company("Acme"))])?;
    std::io::Write::write_all(&mut requests, b"{not json}\n")?;
    std::io::Write::write_all(
        &mut requests,
        b"{\"op\":\"get\",\"resource\":\"company\",\"id\":1}\n",
    )?;

    let mut cmd = Command::new(cargo_bin!("pos-backoffice"));
    cmd.arg(requests.path());

    let assert = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading request"));
    let lines = responses(&assert.get_output().stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["response"]["message"], json!("Company found"));

    Ok(())
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!("pos-backoffice"));
    cmd.arg("tests/fixtures/does-not-exist.jsonl");

    cmd.assert().failure();
}
