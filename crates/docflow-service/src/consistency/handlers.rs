//! Event handlers that drive the consistency maintainer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use docflow_core::events::{DomainEvent, EventKind, EventPayload};
use docflow_core::result::AppResult;
use docflow_events::EventHandler;

use super::maintainer::ConsistencyMaintainer;

/// Task handlers run before project handlers, so the project refresh sees
/// current task summaries.
pub const TASK_HANDLER_PRIORITY: i32 = 10;

/// Priority of the project-level handler.
pub const PROJECT_HANDLER_PRIORITY: i32 = 20;

/// Events that change a task's files.
pub const TASK_EVENTS: [EventKind; 3] = [
    EventKind::FileCreated,
    EventKind::FileDeleted,
    EventKind::VersionCreated,
];

/// Events that change anything a project summarizes.
pub const PROJECT_EVENTS: [EventKind; 7] = [
    EventKind::FileCreated,
    EventKind::FileDeleted,
    EventKind::VersionCreated,
    EventKind::TaskCreated,
    EventKind::TaskDeleted,
    EventKind::ParticipantAdded,
    EventKind::ParticipantRemoved,
];

/// Refreshes the task owning the file an event is about.
#[derive(Debug, Clone)]
pub struct TaskSummaryHandler {
    maintainer: Arc<ConsistencyMaintainer>,
}

impl TaskSummaryHandler {
    /// Creates a new handler.
    pub fn new(maintainer: Arc<ConsistencyMaintainer>) -> Self {
        Self { maintainer }
    }
}

#[async_trait]
impl EventHandler for TaskSummaryHandler {
    async fn handle(&self, event: &DomainEvent) -> AppResult<()> {
        let EventPayload::File(file_event) = &event.payload else {
            debug!(event = %event.kind(), "Not a file event, task summary untouched");
            return Ok(());
        };
        self.maintainer.refresh_task(file_event.task_id()).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "task_summary"
    }
}

/// Refreshes the project an event affects.
#[derive(Debug, Clone)]
pub struct ProjectSummaryHandler {
    maintainer: Arc<ConsistencyMaintainer>,
}

impl ProjectSummaryHandler {
    /// Creates a new handler.
    pub fn new(maintainer: Arc<ConsistencyMaintainer>) -> Self {
        Self { maintainer }
    }
}

#[async_trait]
impl EventHandler for ProjectSummaryHandler {
    async fn handle(&self, event: &DomainEvent) -> AppResult<()> {
        self.maintainer.refresh_project(event.project_id()).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "project_summary"
    }
}
