use super::Resource;
use crate::domain::descriptor::{
    DateBound, FieldKind, FieldRule, Reference, ResourceDescriptor, UniqueName,
};
use crate::domain::record::{RecordId, ResourceKind, Status};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const EXPENSES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Expenses,
    fields: &[
        FieldRule::name(),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[Reference::new("companyId", ResourceKind::Company)],
    unique: Some(UniqueName {
        field: "name",
        scope: Some("companyId"),
    }),
};

const ITEM_EXPENSES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ItemExpenses,
    fields: &[
        FieldRule::required("price", FieldKind::Money),
        FieldRule::required("orderDate", FieldKind::Date(DateBound::Unbounded)),
        FieldRule::required("expensesId", FieldKind::Id),
        FieldRule::required("branchId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[
        Reference::new("expensesId", ResourceKind::Expenses),
        Reference::new("branchId", ResourceKind::Branch),
    ],
    unique: None,
};

/// An expense category ("rent", "ingredients") owned by a company.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Expenses {
    pub id: RecordId,
    pub name: String,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Expenses {
    const DESCRIPTOR: &'static ResourceDescriptor = &EXPENSES;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// One spend booked against an expense category at a branch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItemExpenses {
    pub id: RecordId,
    pub price: Decimal,
    pub order_date: DateTime<Utc>,
    pub expenses_id: RecordId,
    pub branch_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for ItemExpenses {
    const DESCRIPTOR: &'static ResourceDescriptor = &ITEM_EXPENSES;

    fn id(&self) -> RecordId {
        self.id
    }
}
