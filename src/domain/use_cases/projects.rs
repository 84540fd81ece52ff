use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::session::SessionGate,
    entities::{
        language::Language,
        project::{NewProjectRequest, ProjectRecord, ProjectSummaryView, ProjectView},
    },
    errors::AppError,
    events::Subscription,
    repositories::project::ProjectRepository,
    storage::KeyValueStore,
    utils::clock::{Clock, SystemClock},
};

/// Entry point for rendering layers: public reads, admin-gated writes.
pub struct ProjectHandler<R, S>
where
    R: ProjectRepository,
    S: KeyValueStore,
{
    pub project_repo: Arc<R>,
    pub session: Arc<SessionGate<S>>,
    clock: Arc<dyn Clock>,
}

impl<R, S> ProjectHandler<R, S>
where
    R: ProjectRepository,
    S: KeyValueStore,
{
    pub fn new(project_repo: Arc<R>, session: Arc<SessionGate<S>>) -> Self {
        ProjectHandler {
            project_repo,
            session,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn list_projects(&self) -> Vec<ProjectRecord> {
        self.project_repo.list()
    }

    /// Cards for the "all projects" page, in stored order.
    pub fn list_summaries(&self, language: Language) -> Vec<ProjectSummaryView> {
        self.project_repo.list()
            .iter()
            .map(|p| p.to_summary_view(language))
            .collect()
    }

    pub fn get_project(&self, slug: &str) -> Option<ProjectRecord> {
        self.project_repo.get_by_slug(slug)
    }

    pub fn project_view(&self, slug: &str, language: Language) -> Option<ProjectView> {
        self.project_repo.get_by_slug(slug).map(|p| p.to_view(language))
    }

    pub fn featured_project(&self) -> Option<ProjectRecord> {
        self.project_repo.get_featured()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.project_repo.subscribe(Box::new(callback))
    }

    /// Builds a record from the add-project form and appends it.
    pub fn create_project(&self, request: NewProjectRequest) -> Result<ProjectRecord, AppError> {
        self.session.require_admin()?;

        let record = request.into_record(self.clock.now())?;
        self.project_repo.add(record.clone())?;

        Ok(record)
    }

    /// Appends a complete record. Duplicate ids or slugs are not rejected.
    pub fn add_project(&self, record: ProjectRecord) -> Result<(), AppError> {
        self.session.require_admin()?;
        record.validate()?;

        if self.project_repo.get_by_slug(&record.slug).is_some() {
            tracing::warn!("Project slug {} already exists; the new record will be unreachable by slug", record.slug);
        }

        self.project_repo.add(record)
    }

    pub fn update_project(&self, id: &str, record: ProjectRecord) -> Result<(), AppError> {
        self.session.require_admin()?;
        record.validate()?;

        if self.project_repo.update(id, record)? {
            Ok(())
        } else {
            Err(AppError::NotFound("Project not found".to_string()))
        }
    }

    pub fn delete_project(&self, id: &str) -> Result<(), AppError> {
        self.session.require_admin()?;

        if self.project_repo.remove(id)? {
            Ok(())
        } else {
            Err(AppError::NotFound("Project not found".to_string()))
        }
    }
}
