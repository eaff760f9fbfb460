//! Typed records of the back office, each paired with the descriptor that
//! drives its validation, reference checks and name uniqueness.

pub mod branch;
pub mod catalog;
pub mod company;
pub mod expenses;
pub mod staff;
pub mod table;

use super::descriptor::ResourceDescriptor;
use super::record::RecordId;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use branch::Branch;
pub use catalog::{ItemPromotion, Product, ProductType, Promotion, Unit};
pub use company::Company;
pub use expenses::{Expenses, ItemExpenses};
pub use staff::{Employee, Position, Role};
pub use table::Table;

pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const DESCRIPTOR: &'static ResourceDescriptor;

    fn id(&self) -> RecordId;
}
