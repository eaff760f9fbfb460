use super::filter::Filter;
use super::record::{Document, RecordId, ResourceKind};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence port. Lookups keep `Ok(None)` (absent) apart from `Err` (failed).
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>>;

    /// Matching records in identifier order.
    async fn find(&self, kind: ResourceKind, filter: &Filter) -> Result<Vec<Document>>;

    /// Assigns the next identifier and returns the stored record.
    async fn insert(&self, kind: ResourceKind, document: Document) -> Result<Document>;

    /// Merges `patch` into the record; `None` when it does not exist.
    async fn update(
        &self,
        kind: ResourceKind,
        id: RecordId,
        patch: Document,
    ) -> Result<Option<Document>>;

    /// Removes the record and returns it; `None` when it does not exist.
    async fn delete(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>>;

    async fn find_first(&self, kind: ResourceKind, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.find(kind, filter).await?.into_iter().next())
    }

    async fn count(&self, kind: ResourceKind, filter: &Filter) -> Result<usize> {
        Ok(self.find(kind, filter).await?.len())
    }
}

pub type RecordStoreBox = Box<dyn RecordStore>;
