use super::Resource;
use crate::domain::descriptor::{FieldKind, FieldRule, ResourceDescriptor, UniqueName};
use crate::domain::record::{RecordId, ResourceKind, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const COMPANY: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Company,
    fields: &[
        FieldRule::name(),
        FieldRule::required("address", FieldKind::Text { max_len: None }),
        FieldRule::required("tax", FieldKind::Digits { max_len: 13 }),
        FieldRule::required("phone", FieldKind::Digits { max_len: 10 }),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("logo", FieldKind::Text { max_len: None }),
        FieldRule::status("status"),
    ],
    references: &[],
    unique: Some(UniqueName {
        field: "name",
        scope: None,
    }),
};

/// Root of the hierarchy; every other record hangs off a company.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub tax: String,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Company {
    const DESCRIPTOR: &'static ResourceDescriptor = &COMPANY;

    fn id(&self) -> RecordId {
        self.id
    }
}
