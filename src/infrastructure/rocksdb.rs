use crate::domain::filter::Filter;
use crate::domain::ports::RecordStore;
use crate::domain::record::{Document, ID, RecordId, ResourceKind};
use crate::error::{PosError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding the last identifier handed out per resource kind.
pub const CF_SEQUENCES: &str = "sequences";

/// A persistent store implementation using RocksDB.
///
/// Each resource kind lives in its own Column Family named after its key, with
/// big-endian identifiers as keys so iteration follows identifier order.
/// Documents are stored as JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`). Writes
/// are serialized so identifier allocation and read-modify-write updates
/// cannot interleave.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    writes: Arc<Mutex<()>>,
}

fn internal(message: impl Into<String>) -> PosError {
    PosError::InternalError(Box::new(std::io::Error::other(message.into())))
}

fn decode(bytes: &[u8]) -> Result<Document> {
    serde_json::from_slice(bytes).map_err(|e| {
        PosError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

fn encode(document: &Document) -> Result<Vec<u8>> {
    serde_json::to_vec(document).map_err(|e| {
        PosError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures one column family per resource kind plus the sequences family.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = ResourceKind::ALL
            .iter()
            .map(|kind| kind.key())
            .chain(std::iter::once(CF_SEQUENCES))
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self {
            db: Arc::new(db),
            writes: Arc::new(Mutex::new(())),
        })
    }

    fn family(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("Column family {name} not found")))
    }

    fn read(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>> {
        let cf = self.family(kind.key())?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn last_id(&self, kind: ResourceKind) -> Result<RecordId> {
        let cf = self.family(CF_SEQUENCES)?;
        match self.db.get_cf(cf, kind.key())? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| internal(format!("Corrupt sequence for {kind}")))?;
                Ok(RecordId::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl RecordStore for RocksDBStore {
    async fn get(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>> {
        self.read(kind, id)
    }

    async fn find(&self, kind: ResourceKind, filter: &Filter) -> Result<Vec<Document>> {
        let cf = self.family(kind.key())?;
        let mut documents = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let document = decode(&value)?;
            if filter.matches(&document) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    async fn insert(&self, kind: ResourceKind, mut document: Document) -> Result<Document> {
        let _guard = self.writes.lock().await;
        let id = self.last_id(kind)? + 1;
        document.insert(ID.to_string(), Value::from(id));

        let mut batch = WriteBatch::default();
        batch.put_cf(self.family(CF_SEQUENCES)?, kind.key(), id.to_be_bytes());
        batch.put_cf(self.family(kind.key())?, id.to_be_bytes(), encode(&document)?);
        self.db.write(batch)?;

        Ok(document)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: RecordId,
        patch: Document,
    ) -> Result<Option<Document>> {
        let _guard = self.writes.lock().await;
        let Some(mut document) = self.read(kind, id)? else {
            return Ok(None);
        };
        for (field, value) in patch {
            if field != ID {
                document.insert(field, value);
            }
        }
        self.db
            .put_cf(self.family(kind.key())?, id.to_be_bytes(), encode(&document)?)?;
        Ok(Some(document))
    }

    async fn delete(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Document>> {
        let _guard = self.writes.lock().await;
        let existing = self.read(kind, id)?;
        if existing.is_some() {
            self.db.delete_cf(self.family(kind.key())?, id.to_be_bytes())?;
        }
        Ok(existing)
    }
}
