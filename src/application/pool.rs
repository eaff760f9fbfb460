use crate::domain::ports::{RecordStore, RecordStoreBox};
use crate::error::Result;
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

pub const DEFAULT_MAX_CONNECTIONS: usize = 8;

/// Bounded set of store handles.
///
/// Every unit of work acquires a [`Connection`] before touching the store and
/// gives it back when the handle is dropped, whichever way the work ends.
#[derive(Clone)]
pub struct ConnectionPool {
    store: Arc<dyn RecordStore>,
    permits: Arc<Semaphore>,
    size: usize,
}

impl ConnectionPool {
    pub fn new(store: RecordStoreBox, max_connections: usize) -> Self {
        let size = max_connections.max(1);
        Self {
            store: Arc::from(store),
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Waits for a free slot and returns a handle bound to it.
    pub async fn acquire(&self) -> Result<Connection> {
        let permit = Arc::clone(&self.permits).acquire_owned().await?;
        trace!(idle = self.idle(), "connection acquired");
        Ok(Connection {
            store: Arc::clone(&self.store),
            _permit: permit,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Connections not currently checked out.
    pub fn idle(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Scoped store handle; releases its pool slot on drop.
pub struct Connection {
    store: Arc<dyn RecordStore>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for Connection {
    type Target = dyn RecordStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
