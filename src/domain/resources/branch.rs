use super::Resource;
use crate::domain::descriptor::{
    DateBound, FieldKind, FieldRule, Reference, ResourceDescriptor, UniqueName,
};
use crate::domain::record::{RecordId, ResourceKind, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BRANCH: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Branch,
    fields: &[
        FieldRule::name(),
        FieldRule::required("codeReceipt", FieldKind::Text { max_len: Some(10) }),
        FieldRule::required("address", FieldKind::Text { max_len: None }),
        FieldRule::required("expiration", FieldKind::Date(DateBound::Future)),
        FieldRule::required("phone", FieldKind::Digits { max_len: 10 }),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[Reference::new("companyId", ResourceKind::Company)],
    unique: Some(UniqueName {
        field: "name",
        scope: Some("companyId"),
    }),
};

/// A company outlet. `code_receipt` prefixes every receipt issued here.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: RecordId,
    pub name: String,
    pub code_receipt: String,
    pub address: String,
    /// End of the branch's licence; must lie in the future when written.
    pub expiration: DateTime<Utc>,
    pub phone: String,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Branch {
    const DESCRIPTOR: &'static ResourceDescriptor = &BRANCH;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::validate;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn test_branch_rules() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let candidate = json!({
            "name": "Main",
            "codeReceipt": "BR01-TOO-LONG",
            "address": "123 St",
            "expiration": (now + Duration::days(1)).to_rfc3339(),
            "phone": "012345678x",
            "companyId": 1,
            "status": "Active"
        });

        let problems = validate(Branch::DESCRIPTOR, &candidate, now);
        let messages: Vec<&str> = problems.iter().map(|p| p.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "codeReceipt must not exceed 10 characters",
                "phone must contain digits only"
            ]
        );
    }

    #[test]
    fn test_branch_uniqueness_is_company_scoped() {
        let unique = Branch::DESCRIPTOR.unique.unwrap();
        assert_eq!(unique.scope, Some("companyId"));
        assert_eq!(
            Branch::DESCRIPTOR.reference("companyId").map(|r| r.target),
            Some(ResourceKind::Company)
        );
    }
}
