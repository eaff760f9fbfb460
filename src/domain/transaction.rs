use super::descriptor::{FieldKind, FieldRule, Reference, ResourceDescriptor};
use super::record::{RecordId, ResourceKind, Status};
use super::resources::{Resource, Table};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Digits of the running sequence appended to a branch's receipt prefix.
pub const RUNNING_NUMBER_WIDTH: usize = 6;

/// Fields accepted when a table is opened for service.
const OPEN_TRANSACTION: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Transaction,
    fields: &[
        FieldRule::required("tableId", FieldKind::Id),
        FieldRule::required("peoples", FieldKind::Integer { min: 1 }),
        FieldRule::required("expiration", FieldKind::Integer { min: 1 }),
        FieldRule::required("branchId", FieldKind::Id),
        FieldRule::required("employeeId", FieldKind::Id),
    ],
    references: &[
        Reference::new("tableId", ResourceKind::Table),
        Reference::new("branchId", ResourceKind::Branch),
        Reference::new("employeeId", ResourceKind::Employee),
    ],
    unique: None,
};

/// Validated request to seat guests at a table.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub table_id: RecordId,
    pub peoples: i64,
    /// Sitting length in minutes.
    pub expiration: i64,
    pub branch_id: RecordId,
    pub employee_id: RecordId,
}

/// One sitting at a table, from opening to close.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub table_id: RecordId,
    pub receipt: String,
    pub start_order: DateTime<Utc>,
    pub end_order: DateTime<Utc>,
    pub peoples: i64,
    pub total_price: Decimal,
    pub branch_id: RecordId,
    pub employee_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Transaction {
    const DESCRIPTOR: &'static ResourceDescriptor = &OPEN_TRANSACTION;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: RecordId,
    pub receipt: String,
    pub start_order: DateTime<Utc>,
    pub end_order: DateTime<Utc>,
    pub peoples: i64,
}

impl From<Transaction> for OrderSummary {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            receipt: tx.receipt,
            start_order: tx.start_order,
            end_order: tx.end_order,
            peoples: tx.peoples,
        }
    }
}

/// A table together with the sitting currently running on it, if any.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TableOverview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub id: RecordId,
    pub name: String,
    pub stoves: i64,
    pub people: i64,
    pub expiration: i64,
    pub transaction_order: Option<OrderSummary>,
}

impl TableOverview {
    pub fn new(table: Table, order: Option<Transaction>) -> Self {
        Self {
            index: None,
            id: table.id,
            name: table.name,
            stoves: table.stoves,
            people: table.people,
            expiration: table.expiration,
            transaction_order: order.map(OrderSummary::from),
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Receipt code for the next sitting: the branch prefix followed by the
/// zero-padded position of this sitting within the period.
pub fn running_number(prefix: &str, existing: usize) -> String {
    format!(
        "{prefix}{:0width$}",
        existing + 1,
        width = RUNNING_NUMBER_WIDTH
    )
}

/// Midnight UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|first| first.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now)
}
