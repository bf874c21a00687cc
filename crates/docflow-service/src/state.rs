//! Service graph shared by the CLI and tests.

use std::sync::Arc;

use tracing::info;

use docflow_core::config::AppConfig;
use docflow_core::traits::ContentExtractor;
use docflow_database::AggregateRepository;
use docflow_diff::{DiffEngine, TextExtractor};
use docflow_events::EventBus;

use crate::consistency::ConsistencyMaintainer;
use crate::file::{FileService, VersionFactory, VersionService};
use crate::project::ProjectService;
use crate::task::TaskService;

/// All services wired over one repository and one event bus.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppServices {
    // ── Infrastructure ───────────────────────────────────────
    /// Aggregate repository
    pub repository: Arc<dyn AggregateRepository>,
    /// Domain event bus
    pub bus: Arc<EventBus>,
    /// Diff engine with its content extractor
    pub engine: Arc<DiffEngine>,

    // ── Consistency ──────────────────────────────────────────
    /// Aggregate summary maintainer
    pub maintainer: Arc<ConsistencyMaintainer>,

    // ── Services ─────────────────────────────────────────────
    /// Project lifecycle and read models
    pub projects: Arc<ProjectService>,
    /// Task lifecycle and membership
    pub tasks: Arc<TaskService>,
    /// File workflow
    pub files: Arc<FileService>,
    /// Version history
    pub versions: Arc<VersionService>,
}

impl AppServices {
    /// Build the service graph and subscribe the consistency handlers.
    pub async fn build(config: &AppConfig, repository: Arc<dyn AggregateRepository>) -> Self {
        let extractor: Arc<dyn ContentExtractor> =
            Arc::new(TextExtractor::from_config(&config.extraction));
        let engine = Arc::new(DiffEngine::new(extractor.clone()));
        let bus = Arc::new(EventBus::new());

        let maintainer = Arc::new(ConsistencyMaintainer::new(
            repository.clone(),
            config.consistency.clone(),
        ));
        maintainer.register(&bus).await;

        let factory = Arc::new(VersionFactory::new(engine.clone()));
        let projects = Arc::new(ProjectService::new(repository.clone(), maintainer.clone()));
        let tasks = Arc::new(TaskService::new(
            repository.clone(),
            bus.clone(),
            config.consistency.clone(),
        ));
        let files = Arc::new(FileService::new(repository.clone(), factory, bus.clone()));
        let versions = Arc::new(VersionService::new(repository.clone(), extractor));

        info!(
            max_content_bytes = config.extraction.max_content_bytes,
            max_retries = config.consistency.max_retries,
            "Services initialized"
        );

        Self {
            repository,
            bus,
            engine,
            maintainer,
            projects,
            tasks,
            files,
            versions,
        }
    }
}
