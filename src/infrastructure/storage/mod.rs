use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};

use crate::{errors::StorageError, settings::AppConfig};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A write observed on a shared backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: u64,
}

/// What a [`StorageWatcher`] yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed(StorageEvent),
    /// The watcher fell behind and this many events were dropped. Any slot
    /// may have changed.
    Lagged(u64),
}

impl WatchEvent {
    /// Whether `key` may have been written.
    pub fn touches(&self, key: &str) -> bool {
        match self {
            WatchEvent::Changed(event) => event.key == key,
            WatchEvent::Lagged(_) => true,
        }
    }
}

/// Durable keyed string slots.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Writes made by *other* views of the same backend, when the backend
    /// can observe them.
    fn watch(&self) -> Option<StorageWatcher> {
        None
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn watch(&self) -> Option<StorageWatcher> {
        (**self).watch()
    }
}

/// Receives storage events, skipping the ones the watching view caused.
pub struct StorageWatcher {
    receiver: broadcast::Receiver<StorageEvent>,
    view_id: u64,
}

impl StorageWatcher {
    pub(crate) fn new(receiver: broadcast::Receiver<StorageEvent>, view_id: u64) -> Self {
        StorageWatcher { receiver, view_id }
    }

    /// `None` once the backend is gone.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.view_id => continue,
                Ok(event) => return Some(WatchEvent::Changed(event)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Storage watcher lagged, skipped {} events", skipped);
                    return Some(WatchEvent::Lagged(skipped));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Backend selected by configuration.
#[derive(Clone)]
pub enum StorageBackend {
    Memory(MemoryStore),
    File(FileStore),
}

impl StorageBackend {
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        match config.storage_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => {
                tracing::info!("Using file storage at {}", dir);
                Ok(StorageBackend::File(FileStore::open(dir)?))
            }
            _ => {
                tracing::info!("No storage directory configured, using in-memory storage");
                Ok(StorageBackend::Memory(MemoryStore::new()))
            }
        }
    }
}

impl KeyValueStore for StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            StorageBackend::Memory(store) => store.get(key),
            StorageBackend::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            StorageBackend::Memory(store) => store.set(key, value),
            StorageBackend::File(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            StorageBackend::Memory(store) => store.remove(key),
            StorageBackend::File(store) => store.remove(key),
        }
    }

    fn watch(&self) -> Option<StorageWatcher> {
        match self {
            StorageBackend::Memory(store) => store.watch(),
            StorageBackend::File(store) => store.watch(),
        }
    }
}
