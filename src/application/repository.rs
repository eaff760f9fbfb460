use super::pool::ConnectionPool;
use crate::domain::filter::Filter;
use crate::domain::record::{CREATED_AT, Document, RecordId, ResourceKind};
use crate::domain::resources::Resource;
use crate::error::{PosError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::error;

/// Typed gateway to the store.
///
/// Mutating and reading methods each run exactly one store operation on a
/// freshly acquired connection. Any failure is logged with its cause and
/// surfaces as [`PosError::Persistence`] so callers only ever see a generic
/// message. `lookup` and `find_first` serve the checks and keep the raw
/// `Result<Option<_>>` so the caller decides how to fail.
#[derive(Clone)]
pub struct Repository {
    pool: ConnectionPool,
}

fn decode<R: Resource>(document: Document) -> Result<R> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

fn persistence(kind: ResourceKind, action: &'static str, cause: PosError) -> PosError {
    error!(resource = %kind, action, error = %cause, "store operation failed");
    PosError::Persistence { action }
}

impl Repository {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub async fn lookup(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>> {
        let conn = self.pool.acquire().await?;
        conn.get(kind, id).await
    }

    pub async fn find_first(&self, kind: ResourceKind, filter: &Filter) -> Result<Option<Document>> {
        let conn = self.pool.acquire().await?;
        conn.find_first(kind, filter).await
    }

    pub async fn fetch<R: Resource>(&self, id: RecordId) -> Result<Option<R>> {
        let kind = R::DESCRIPTOR.kind;
        self.try_fetch(kind, id)
            .await
            .map_err(|cause| persistence(kind, "reading", cause))
    }

    pub async fn fetch_many<R: Resource>(&self, filter: &Filter) -> Result<Vec<R>> {
        let kind = R::DESCRIPTOR.kind;
        self.try_fetch_many(kind, filter)
            .await
            .map_err(|cause| persistence(kind, "reading", cause))
    }

    pub async fn count(&self, kind: ResourceKind, filter: &Filter) -> Result<usize> {
        self.try_count(kind, filter)
            .await
            .map_err(|cause| persistence(kind, "reading", cause))
    }

    /// Stamps `createdAt` and stores the record; the store assigns the id.
    pub async fn insert<R: Resource>(
        &self,
        mut document: Document,
        created_at: DateTime<Utc>,
    ) -> Result<R> {
        let kind = R::DESCRIPTOR.kind;
        document.insert(
            CREATED_AT.to_string(),
            Value::String(created_at.to_rfc3339()),
        );
        self.try_insert(kind, document)
            .await
            .map_err(|cause| persistence(kind, "saving", cause))
    }

    pub async fn update<R: Resource>(&self, id: RecordId, patch: Document) -> Result<Option<R>> {
        let kind = R::DESCRIPTOR.kind;
        self.try_update(kind, id, patch)
            .await
            .map_err(|cause| persistence(kind, "saving", cause))
    }

    pub async fn delete<R: Resource>(&self, id: RecordId) -> Result<Option<R>> {
        let kind = R::DESCRIPTOR.kind;
        self.try_delete(kind, id)
            .await
            .map_err(|cause| persistence(kind, "deleting", cause))
    }

    async fn try_fetch<R: Resource>(&self, kind: ResourceKind, id: RecordId) -> Result<Option<R>> {
        let conn = self.pool.acquire().await?;
        conn.get(kind, id).await?.map(decode).transpose()
    }

    async fn try_fetch_many<R: Resource>(&self, kind: ResourceKind, filter: &Filter) -> Result<Vec<R>> {
        let conn = self.pool.acquire().await?;
        conn.find(kind, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn try_count(&self, kind: ResourceKind, filter: &Filter) -> Result<usize> {
        let conn = self.pool.acquire().await?;
        conn.count(kind, filter).await
    }

    async fn try_insert<R: Resource>(&self, kind: ResourceKind, document: Document) -> Result<R> {
        let conn = self.pool.acquire().await?;
        decode(conn.insert(kind, document).await?)
    }

    async fn try_update<R: Resource>(
        &self,
        kind: ResourceKind,
        id: RecordId,
        patch: Document,
    ) -> Result<Option<R>> {
        let conn = self.pool.acquire().await?;
        conn.update(kind, id, patch).await?.map(decode).transpose()
    }

    async fn try_delete<R: Resource>(&self, kind: ResourceKind, id: RecordId) -> Result<Option<R>> {
        let conn = self.pool.acquire().await?;
        conn.delete(kind, id).await?.map(decode).transpose()
    }
}
