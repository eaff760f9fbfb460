use super::Resource;
use crate::domain::descriptor::{FieldKind, FieldRule, Reference, ResourceDescriptor, UniqueName};
use crate::domain::record::{RecordId, ResourceKind, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const TABLE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Table,
    fields: &[
        FieldRule::name(),
        FieldRule::required("stoves", FieldKind::Integer { min: 0 }),
        FieldRule::required("people", FieldKind::Integer { min: 1 }),
        FieldRule::required("expiration", FieldKind::Integer { min: 1 }),
        FieldRule::required("branchId", FieldKind::Id),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[
        Reference::new("branchId", ResourceKind::Branch),
        Reference::new("companyId", ResourceKind::Company),
    ],
    unique: Some(UniqueName {
        field: "name",
        scope: Some("branchId"),
    }),
};

/// A dining table. `expiration` is the default sitting length in minutes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: RecordId,
    pub name: String,
    pub stoves: i64,
    pub people: i64,
    pub expiration: i64,
    pub branch_id: RecordId,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Table {
    const DESCRIPTOR: &'static ResourceDescriptor = &TABLE;

    fn id(&self) -> RecordId {
        self.id
    }
}
