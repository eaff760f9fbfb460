use crate::domain::filter::Filter;
use crate::domain::ports::RecordStore;
use crate::domain::record::{Document, ID, RecordId, ResourceKind};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collection {
    last_id: RecordId,
    rows: BTreeMap<RecordId, Document>,
}

/// A thread-safe in-memory record store.
///
/// Uses `Arc<RwLock<..>>` over one ordered map per resource kind so bulk reads
/// come back in identifier order. Identifiers are never reused, even after a
/// delete.
#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<HashMap<ResourceKind, Collection>>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .and_then(|collection| collection.rows.get(&id))
            .cloned())
    }

    async fn find(&self, kind: ResourceKind, filter: &Filter) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .map(|collection| {
                collection
                    .rows
                    .values()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, kind: ResourceKind, mut document: Document) -> Result<Document> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();
        collection.last_id += 1;
        let id = collection.last_id;
        document.insert(ID.to_string(), Value::from(id));
        collection.rows.insert(id, document.clone());
        Ok(document)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: RecordId,
        patch: Document,
    ) -> Result<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(row) = collections
            .get_mut(&kind)
            .and_then(|collection| collection.rows.get_mut(&id))
        else {
            return Ok(None);
        };
        for (field, value) in patch {
            if field != ID {
                row.insert(field, value);
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&kind)
            .and_then(|collection| collection.rows.remove(&id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids_per_kind() {
        let store = InMemoryRecordStore::new();

        let first = store
            .insert(ResourceKind::Company, document(json!({"name": "Acme"})))
            .await
            .unwrap();
        let second = store
            .insert(ResourceKind::Company, document(json!({"name": "Globex"})))
            .await
            .unwrap();
        let branch = store
            .insert(ResourceKind::Branch, document(json!({"name": "Main"})))
            .await
            .unwrap();

        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
        assert_eq!(branch["id"], json!(1));

        let retrieved = store.get(ResourceKind::Company, 2).await.unwrap().unwrap();
        assert_eq!(retrieved, second);
        assert!(store.get(ResourceKind::Company, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_filters_in_id_order() {
        let store = InMemoryRecordStore::new();
        for (name, company) in [("A", 1), ("B", 2), ("C", 1)] {
            store
                .insert(
                    ResourceKind::Branch,
                    document(json!({"name": name, "companyId": company})),
                )
                .await
                .unwrap();
        }

        let filter = Filter::all().eq("companyId", 1u64);
        let names: Vec<Value> = store
            .find(ResourceKind::Branch, &filter)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("A"), json!("C")]);
        assert_eq!(store.count(ResourceKind::Branch, &filter).await.unwrap(), 2);
        assert!(
            store
                .find(ResourceKind::Unit, &Filter::all())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_id() {
        let store = InMemoryRecordStore::new();
        store
            .insert(
                ResourceKind::Unit,
                document(json!({"name": "plate", "status": "Active"})),
            )
            .await
            .unwrap();

        let updated = store
            .update(
                ResourceKind::Unit,
                1,
                document(json!({"id": 9, "status": "InActive"})),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            updated,
            document(json!({"id": 1, "name": "plate", "status": "InActive"}))
        );

        assert!(
            store
                .update(ResourceKind::Unit, 2, Document::new())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_does_not_reuse_ids() {
        let store = InMemoryRecordStore::new();
        store
            .insert(ResourceKind::Unit, document(json!({"name": "plate"})))
            .await
            .unwrap();

        let removed = store.delete(ResourceKind::Unit, 1).await.unwrap();
        assert!(removed.is_some());
        assert!(store.delete(ResourceKind::Unit, 1).await.unwrap().is_none());

        let next = store
            .insert(ResourceKind::Unit, document(json!({"name": "bowl"})))
            .await
            .unwrap();
        assert_eq!(next["id"], json!(2));
    }
}
