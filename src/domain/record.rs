use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Store-assigned identifier, unique per resource kind.
pub type RecordId = u64;

/// A record as the store sees it: a JSON object keyed by camelCase field names.
pub type Document = serde_json::Map<String, Value>;

pub const ID: &str = "id";
pub const CREATED_AT: &str = "createdAt";

/// Lifecycle status shared by every record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum Status {
    #[default]
    Active,
    InActive,
}

impl Status {
    pub const ALLOWED: &'static [&'static str] = &["Active", "InActive"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::InActive => "InActive",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Company,
    Branch,
    Position,
    Employee,
    Unit,
    ProductType,
    Product,
    Promotion,
    ItemPromotion,
    Table,
    Expenses,
    ItemExpenses,
    Transaction,
}

impl ResourceKind {
    pub const ALL: [Self; 13] = [
        Self::Company,
        Self::Branch,
        Self::Position,
        Self::Employee,
        Self::Unit,
        Self::ProductType,
        Self::Product,
        Self::Promotion,
        Self::ItemPromotion,
        Self::Table,
        Self::Expenses,
        Self::ItemExpenses,
        Self::Transaction,
    ];

    /// Key used for the payload in response envelopes and for storage namespaces.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Branch => "branch",
            Self::Position => "position",
            Self::Employee => "employee",
            Self::Unit => "unit",
            Self::ProductType => "productType",
            Self::Product => "product",
            Self::Promotion => "promotion",
            Self::ItemPromotion => "itemPromotion",
            Self::Table => "table",
            Self::Expenses => "expenses",
            Self::ItemExpenses => "itemExpenses",
            Self::Transaction => "transaction",
        }
    }

    /// Human-readable name used in messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductType => "product type",
            Self::ItemPromotion => "promotion item",
            Self::ItemExpenses => "expenses item",
            other => other.key(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_keys_match_serde_names() {
        for kind in ResourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }

    #[test]
    fn test_status_round_trip_names() {
        let status: Status = serde_json::from_str("\"InActive\"").unwrap();
        assert_eq!(status, Status::InActive);
        assert_eq!(status.as_str(), "InActive");
        assert!(serde_json::from_str::<Status>("\"inactive\"").is_err());
    }
}
