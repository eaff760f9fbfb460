use super::Resource;
use crate::domain::descriptor::{
    DateBound, FieldKind, FieldRule, Reference, ResourceDescriptor, UniqueName,
};
use crate::domain::record::{RecordId, ResourceKind, Status};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const COMPANY_SCOPED_NAME: Option<UniqueName> = Some(UniqueName {
    field: "name",
    scope: Some("companyId"),
});

const UNIT: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Unit,
    fields: &[
        FieldRule::name(),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[Reference::new("companyId", ResourceKind::Company)],
    unique: COMPANY_SCOPED_NAME,
};

const PRODUCT_TYPE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ProductType,
    ..UNIT
};

const PRODUCT: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Product,
    fields: &[
        FieldRule::name(),
        FieldRule::required("cost", FieldKind::Money),
        FieldRule::required("price", FieldKind::Money),
        FieldRule::required("stock", FieldKind::Integer { min: 0 }),
        FieldRule::optional("imageUrl", FieldKind::Text { max_len: None }),
        FieldRule::required("unitId", FieldKind::Id),
        FieldRule::required("productTypeId", FieldKind::Id),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("statusSail"),
        FieldRule::status("status"),
    ],
    references: &[
        Reference::new("companyId", ResourceKind::Company),
        Reference::new("unitId", ResourceKind::Unit),
        Reference::new("productTypeId", ResourceKind::ProductType),
    ],
    unique: COMPANY_SCOPED_NAME,
};

const PROMOTION: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Promotion,
    fields: &[
        FieldRule::name(),
        FieldRule::required("detail", FieldKind::Text { max_len: Some(255) }),
        FieldRule::required("promotionalPrice", FieldKind::Money),
        FieldRule::required("startDate", FieldKind::Date(DateBound::Unbounded)),
        FieldRule::required("endDate", FieldKind::Date(DateBound::After("startDate"))),
        FieldRule::optional("imageUrl", FieldKind::Text { max_len: None }),
        FieldRule::required("companyId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[Reference::new("companyId", ResourceKind::Company)],
    unique: COMPANY_SCOPED_NAME,
};

const ITEM_PROMOTION: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ItemPromotion,
    fields: &[
        FieldRule::required("productId", FieldKind::Id),
        FieldRule::required("stock", FieldKind::Integer { min: 0 }),
        FieldRule::required("promotionId", FieldKind::Id),
        FieldRule::status("status"),
    ],
    references: &[
        Reference::new("promotionId", ResourceKind::Promotion),
        Reference::new("productId", ResourceKind::Product),
    ],
    unique: Some(UniqueName {
        field: "productId",
        scope: Some("promotionId"),
    }),
};

/// Unit of sale ("plate", "bottle").
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: RecordId,
    pub name: String,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Unit {
    const DESCRIPTOR: &'static ResourceDescriptor = &UNIT;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: RecordId,
    pub name: String,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for ProductType {
    const DESCRIPTOR: &'static ResourceDescriptor = &PRODUCT_TYPE;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub cost: Decimal,
    pub price: Decimal,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub unit_id: RecordId,
    pub product_type_id: RecordId,
    pub company_id: RecordId,
    /// Whether the product is currently offered for sale.
    pub status_sail: Status,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Product {
    const DESCRIPTOR: &'static ResourceDescriptor = &PRODUCT;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: RecordId,
    pub name: String,
    pub detail: String,
    pub promotional_price: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub company_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for Promotion {
    const DESCRIPTOR: &'static ResourceDescriptor = &PROMOTION;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A product offered under a promotion, with the quantity set aside for it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItemPromotion {
    pub id: RecordId,
    pub product_id: RecordId,
    pub stock: i64,
    pub promotion_id: RecordId,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Resource for ItemPromotion {
    const DESCRIPTOR: &'static ResourceDescriptor = &ITEM_PROMOTION;

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::validate;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_promotion_must_end_after_it_starts() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let candidate = json!({
            "name": "Happy hour",
            "detail": "Two for one",
            "promotionalPrice": "99.00",
            "startDate": "2026-11-01",
            "endDate": "2026-11-01",
            "companyId": 1,
            "status": "Active"
        });

        let problems = validate(Promotion::DESCRIPTOR, &candidate, now);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].field, "endDate");
    }

    #[test]
    fn test_product_checks_every_reference() {
        let fields: Vec<&str> = Product::DESCRIPTOR
            .references
            .iter()
            .map(|r| r.field)
            .collect();
        assert_eq!(fields, vec!["companyId", "unitId", "productTypeId"]);
        assert_eq!(ProductType::DESCRIPTOR.kind, ResourceKind::ProductType);
        assert_eq!(ProductType::DESCRIPTOR.fields, Unit::DESCRIPTOR.fields);
    }

    #[test]
    fn test_item_promotion_rules() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let candidate = json!({"productId": 4, "stock": -1, "promotionId": "x", "status": "Active"});

        let problems = validate(ItemPromotion::DESCRIPTOR, &candidate, now);
        let fields: Vec<&str> = problems.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["stock", "promotionId"]);

        let unique = ItemPromotion::DESCRIPTOR.unique.unwrap();
        assert_eq!((unique.field, unique.scope), ("productId", Some("promotionId")));
    }
}
