use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod domain;
mod infrastructure;
mod interfaces;
pub mod constants;
pub mod errors;
pub mod settings;

pub use domain::{entities, seed, use_cases};
pub use infrastructure::{auth, storage, utils};
pub use interfaces::{events, repositories};

use auth::session::SessionGate;
use errors::AppError;
use repositories::project::LocalProjectRepo;
use storage::StorageBackend;
use use_cases::{language::LanguagePreference, projects::ProjectHandler};

pub type AppProjectRepo = LocalProjectRepo<StorageBackend>;
pub type AppProjectHandler = ProjectHandler<AppProjectRepo, StorageBackend>;
pub type AppSessionGate = SessionGate<StorageBackend>;

/// One per process (or per view): the store, the session gate and the
/// language preference over a shared storage backend.
pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub session: Arc<AppSessionGate>,
    pub language: LanguagePreference<StorageBackend>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Result<Self, AppError> {
        let storage = StorageBackend::from_config(config)?;
        Ok(AppState::with_storage(config, storage))
    }

    /// Restores any persisted admin session before returning.
    pub fn with_storage(config: &settings::AppConfig, storage: StorageBackend) -> Self {
        let session = Arc::new(SessionGate::from_config(storage.clone(), config));
        session.restore();

        let project_repo = Arc::new(LocalProjectRepo::new(storage.clone()));
        let project_handler = ProjectHandler::new(project_repo, Arc::clone(&session));
        let language = LanguagePreference::new(storage, config.default_language);

        AppState {
            project_handler,
            session,
            language,
        }
    }
}

pub fn init_tracing(config: &settings::AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
