//! Aggregate consistency maintenance.
//!
//! Denormalized counters and last-modified pointers on tasks and projects
//! are never edited by the services that change files or tasks. Instead,
//! after every change a domain event is published and the handlers here
//! re-derive the summaries from persisted state:
//!
//! | event | task refresh (priority 10) | project refresh (priority 20) |
//! |---|---|---|
//! | `FileCreated`, `FileDeleted`, `VersionCreated` | yes | yes |
//! | `TaskCreated`, `TaskDeleted` | no | yes |
//! | `ParticipantAdded`, `ParticipantRemoved` | no | yes |

pub mod handlers;
pub mod maintainer;
pub mod recompute;

use std::sync::Arc;

use tracing::info;

use docflow_events::EventBus;

pub use handlers::{
    PROJECT_EVENTS, PROJECT_HANDLER_PRIORITY, ProjectSummaryHandler, TASK_EVENTS,
    TASK_HANDLER_PRIORITY, TaskSummaryHandler,
};
pub use maintainer::ConsistencyMaintainer;
pub use recompute::{ProjectTotals, TaskTotals};

impl ConsistencyMaintainer {
    /// Subscribe the task and project handlers on `bus`.
    pub async fn register(self: &Arc<Self>, bus: &EventBus) {
        let task_handler = Arc::new(TaskSummaryHandler::new(self.clone()));
        for kind in TASK_EVENTS {
            bus.subscribe(kind, task_handler.clone(), TASK_HANDLER_PRIORITY)
                .await;
        }

        let project_handler = Arc::new(ProjectSummaryHandler::new(self.clone()));
        for kind in PROJECT_EVENTS {
            bus.subscribe(kind, project_handler.clone(), PROJECT_HANDLER_PRIORITY)
                .await;
        }

        info!(
            task_events = TASK_EVENTS.len(),
            project_events = PROJECT_EVENTS.len(),
            "Consistency handlers registered"
        );
    }
}
