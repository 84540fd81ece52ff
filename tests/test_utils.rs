use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use portfolio_projects::{
    auth::digest::ReferenceDigest,
    entities::project::{
        LinkType, LocalizedContent, ProjectContent, ProjectLink, ProjectRecord, ProjectStatus,
    },
    settings::{AppConfig, AppEnvironment},
    storage::{MemoryStore, StorageBackend},
    utils::clock::Clock,
    AppState,
};

pub const ADMIN_SECRET: &str = "correct-secret";

/// Clock the test moves by hand.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock { now: Arc::new(Mutex::new(start)) }
    }

    #[allow(dead_code)]
    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: MemoryStore,
    pub config: AppConfig,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::spawn_on(MemoryStore::new())
    }

    /// Another process/view over the same slots.
    pub fn spawn_on(store: MemoryStore) -> Self {
        let config = test_config();
        let state = AppState::with_storage(&config, StorageBackend::Memory(store.clone()));
        TestApp { state, store, config }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Projects Test".to_string(),
        admin_password_hash: ReferenceDigest::of_secret(ADMIN_SECRET).to_hex(),
        ..AppConfig::default()
    }
}

pub fn sample_project(id: &str, slug: &str) -> ProjectRecord {
    let content = |title: &str, summary: &str| ProjectContent {
        title: title.to_string(),
        summary: summary.to_string(),
        description: "Test **description**".to_string(),
        tech_stack: vec!["Rust".to_string(), "Tokio".to_string()],
        decisions: vec![],
        learnings: vec![],
        links: vec![ProjectLink {
            label: "GitHub".to_string(),
            url: format!("https://github.com/example/{}", slug),
            link_type: LinkType::Github,
        }],
    };

    ProjectRecord {
        id: id.to_string(),
        slug: slug.to_string(),
        featured: false,
        status: ProjectStatus::InProgress,
        created_at: "Feb 2024".to_string(),
        content: LocalizedContent {
            en: content("Test Project", "A test project"),
            es: content("Proyecto de Prueba", "Un proyecto de prueba"),
        },
    }
}
