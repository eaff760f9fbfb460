use super::Resource;
use crate::domain::descriptor::{FieldKind, FieldRule, Reference, ResourceDescriptor, UniqueName};
use crate::domain::record::{RecordId, ResourceKind, Status};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const POSITION: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Position,
    fields: &[
        FieldRule::name(),
        FieldRule::required("salary", FieldKind::Money),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[Reference::new("companyId", ResourceKind::Company)],
    unique: Some(UniqueName {
        field: "name",
        scope: Some("companyId"),
    }),
};

const EMPLOYEE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Employee,
    fields: &[
        FieldRule::name(),
        FieldRule::required("subname", FieldKind::Text { max_len: Some(50) }),
        FieldRule::required("age", FieldKind::Integer { min: 15 }),
        FieldRule::required("cardId", FieldKind::Digits { max_len: 13 }),
        FieldRule::required("userName", FieldKind::Text { max_len: Some(50) }),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::required("branchId", FieldKind::Id),
        FieldRule::required("positionId", FieldKind::Id),
        FieldRule::required("role", FieldKind::OneOf(Role::ALLOWED)),
        FieldRule::status("status"),
    ],
    references: &[
        Reference::new("companyId", ResourceKind::Company),
        Reference::new("branchId", ResourceKind::Branch),
        Reference::new("positionId", ResourceKind::Position),
    ],
    unique: Some(UniqueName {
        field: "userName",
        scope: Some("companyId"),
    }),
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: RecordId,
    pub name: String,
    pub salary: Decimal,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Position {
    const DESCRIPTOR: &'static ResourceDescriptor = &POSITION;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    UserAdmin,
    User,
}

impl Role {
    pub const ALLOWED: &'static [&'static str] = &["admin", "userAdmin", "user"];
}

/// Staff member. Credentials are issued elsewhere and never stored here.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub subname: String,
    pub age: i64,
    pub card_id: String,
    pub user_name: String,
    pub company_id: RecordId,
    pub branch_id: RecordId,
    pub position_id: RecordId,
    pub role: Role,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Employee {
    const DESCRIPTOR: &'static ResourceDescriptor = &EMPLOYEE;

    fn id(&self) -> RecordId {
        self.id
    }
}
