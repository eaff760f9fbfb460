#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{Error, Write};
use tempfile::NamedTempFile;

/// Writes one request per line to a temporary JSONL file.
pub fn write_requests(requests: &[Value]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    for request in requests {
        writeln!(file, "{request}")?;
    }
    file.flush()?;
    Ok(file)
}

/// Decodes every `{"code", "response"}` line the binary printed.
pub fn responses(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

pub fn add(resource: &str, body: Value) -> Value {
    json!({"op": "add", "resource": resource, "body": body})
}

pub fn company(name: &str) -> Value {
    json!({
        "name": name,
        "address": "1 Market Rd",
        "tax": "1234567890123",
        "phone": "0123456789",
        "email": "owner@acme.example",
        "status": "Active"
    })
}

pub fn branch(name: &str, prefix: &str, company_id: u64) -> Value {
    json!({
        "name": name,
        "codeReceipt": prefix,
        "address": "123 St",
        "expiration": "2099-01-01",
        "phone": "0123456789",
        "companyId": company_id,
        "status": "Active"
    })
}

pub fn position(name: &str, company_id: u64) -> Value {
    json!({"name": name, "salary": "15000.00", "companyId": company_id, "status": "Active"})
}

pub fn employee(user_name: &str, company_id: u64, branch_id: u64, position_id: u64) -> Value {
    json!({
        "name": "Ann",
        "subname": "Lee",
        "age": 28,
        "cardId": "1100700123456",
        "userName": user_name,
        "companyId": company_id,
        "branchId": branch_id,
        "positionId": position_id,
        "role": "user",
        "status": "Active"
    })
}

pub fn table(name: &str, branch_id: u64, company_id: u64) -> Value {
    json!({
        "name": name,
        "stoves": 1,
        "people": 4,
        "expiration": 90,
        "branchId": branch_id,
        "companyId": company_id,
        "status": "Active"
    })
}
