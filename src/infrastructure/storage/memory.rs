use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::DashMap;
use tokio::sync::broadcast;

use super::{KeyValueStore, StorageEvent, StorageWatcher};
use crate::errors::StorageError;

const EVENT_CAPACITY: usize = 64;

struct Shared {
    slots: DashMap<String, String>,
    events: broadcast::Sender<StorageEvent>,
    next_view: AtomicU64,
}

/// In-process slots. Clones are the same view; [`MemoryStore::new_view`]
/// opens another view over the same slots, which then sees this view's
/// writes through [`KeyValueStore::watch`].
#[derive(Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    view_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MemoryStore {
            shared: Arc::new(Shared {
                slots: DashMap::new(),
                events,
                next_view: AtomicU64::new(1),
            }),
            view_id: 0,
        }
    }

    pub fn new_view(&self) -> Self {
        MemoryStore {
            shared: Arc::clone(&self.shared),
            view_id: self.shared.next_view.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn view_id(&self) -> u64 {
        self.view_id
    }

    fn publish(&self, key: &str) {
        // No receivers is fine
        let _ = self.shared.events.send(StorageEvent {
            key: key.to_string(),
            origin: self.view_id,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.shared.slots.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.shared.slots.insert(key.to_string(), value.to_string());
        self.publish(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.shared.slots.remove(key).is_some() {
            self.publish(key);
        }
        Ok(())
    }

    fn watch(&self) -> Option<StorageWatcher> {
        Some(StorageWatcher::new(self.shared.events.subscribe(), self.view_id))
    }
}
