use tokio::task::JoinHandle;

use crate::{
    constants::CATALOG_KEY,
    entities::project::ProjectRecord,
    errors::AppError,
    events::{ChangeNotifier, Subscription},
    seed::seed_catalog,
    storage::KeyValueStore,
};

/// Ordered project catalog.
///
/// Lookups return the first match; uniqueness of `id` and `slug` is up to
/// the caller. Mutations persist the whole catalog and then notify
/// subscribers.
pub trait ProjectRepository: Send + Sync {
    fn list(&self) -> Vec<ProjectRecord>;
    fn get_by_id(&self, id: &str) -> Option<ProjectRecord>;
    fn get_by_slug(&self, slug: &str) -> Option<ProjectRecord>;
    fn get_featured(&self) -> Option<ProjectRecord>;
    fn add(&self, record: ProjectRecord) -> Result<(), AppError>;
    /// `Ok(false)` when no record has `id`; nothing is written then.
    fn update(&self, id: &str, record: ProjectRecord) -> Result<bool, AppError>;
    /// `Ok(false)` when no record has `id`; nothing is written then.
    fn remove(&self, id: &str) -> Result<bool, AppError>;
    fn subscribe(&self, callback: Box<dyn Fn() + Send + Sync>) -> Subscription;
}

/// Catalog kept as one JSON array in the catalog slot. Every call reads the
/// slot afresh, so concurrent views see the last writer's catalog.
pub struct LocalProjectRepo<S>
where
    S: KeyValueStore,
{
    store: S,
    notifier: ChangeNotifier,
}

impl<S> LocalProjectRepo<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        LocalProjectRepo {
            store,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Forwards other views' writes to the catalog slot as change
    /// notifications. `None` when the backend cannot observe other views.
    /// Must be called inside a tokio runtime.
    pub fn spawn_storage_relay(&self) -> Option<JoinHandle<()>> {
        let mut watcher = self.store.watch()?;
        let notifier = self.notifier.clone();

        Some(tokio::spawn(async move {
            while let Some(event) = watcher.recv().await {
                if event.touches(CATALOG_KEY) {
                    tracing::debug!("Catalog may have changed elsewhere: {:?}", event);
                    notifier.notify();
                }
            }
        }))
    }

    fn load(&self) -> Vec<ProjectRecord> {
        let raw = match self.store.get(CATALOG_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return self.seed(),
            Err(e) => {
                tracing::warn!("Failed to read project catalog, using seed: {}", e);
                return seed_catalog();
            }
        };

        match serde_json::from_str::<Vec<ProjectRecord>>(&raw) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Stored project catalog is malformed, using seed: {}", e);
                seed_catalog()
            }
        }
    }

    /// First access on an empty slot. Writing the same seed twice is harmless.
    fn seed(&self) -> Vec<ProjectRecord> {
        let catalog = seed_catalog();
        match self.persist(&catalog) {
            Ok(()) => tracing::info!("Seeded empty project catalog"),
            Err(e) => tracing::warn!("Failed to persist seed catalog: {}", e),
        }
        catalog
    }

    fn persist(&self, catalog: &[ProjectRecord]) -> Result<(), AppError> {
        let json = serde_json::to_string(catalog)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize catalog: {}", e)))?;
        self.store.set(CATALOG_KEY, &json)?;
        Ok(())
    }

    fn commit(&self, catalog: &[ProjectRecord]) -> Result<(), AppError> {
        self.persist(catalog)?;
        self.notifier.notify();
        Ok(())
    }
}

impl<S> ProjectRepository for LocalProjectRepo<S>
where
    S: KeyValueStore,
{
    fn list(&self) -> Vec<ProjectRecord> {
        self.load()
    }

    fn get_by_id(&self, id: &str) -> Option<ProjectRecord> {
        self.load().into_iter().find(|p| p.id == id)
    }

    fn get_by_slug(&self, slug: &str) -> Option<ProjectRecord> {
        self.load().into_iter().find(|p| p.slug == slug)
    }

    fn get_featured(&self) -> Option<ProjectRecord> {
        self.load().into_iter().find(|p| p.featured)
    }

    fn add(&self, record: ProjectRecord) -> Result<(), AppError> {
        let mut catalog = self.load();
        tracing::info!("Adding project {} ({})", record.slug, record.id);
        catalog.push(record);
        self.commit(&catalog)
    }

    fn update(&self, id: &str, record: ProjectRecord) -> Result<bool, AppError> {
        let mut catalog = self.load();
        let Some(slot) = catalog.iter_mut().find(|p| p.id == id) else {
            tracing::debug!("No project with id {} to update", id);
            return Ok(false);
        };

        *slot = record;
        self.commit(&catalog)?;
        tracing::info!("Updated project {}", id);
        Ok(true)
    }

    fn remove(&self, id: &str) -> Result<bool, AppError> {
        let mut catalog = self.load();
        let Some(index) = catalog.iter().position(|p| p.id == id) else {
            tracing::debug!("No project with id {} to remove", id);
            return Ok(false);
        };

        catalog.remove(index);
        self.commit(&catalog)?;
        tracing::info!("Removed project {}", id);
        Ok(true)
    }

    fn subscribe(&self, callback: Box<dyn Fn() + Send + Sync>) -> Subscription {
        self.notifier.subscribe(callback)
    }
}
