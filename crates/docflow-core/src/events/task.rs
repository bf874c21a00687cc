//! Task-related domain events.

use serde::{Deserialize, Serialize};

use super::EventKind;
use crate::types::{ProjectId, TaskId, UserId};

/// Events related to tasks and their participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TaskEvent {
    /// A task was created.
    Created {
        /// The task ID.
        task_id: TaskId,
        /// The project owning the task.
        project_id: ProjectId,
    },
    /// A task was deleted together with its files.
    Deleted {
        /// The task ID (no longer resolvable).
        task_id: TaskId,
        /// The project that owned the task.
        project_id: ProjectId,
        /// File count of the task at deletion time.
        number_of_files: u64,
    },
    /// A participant was added to a task.
    ParticipantAdded {
        /// The task ID.
        task_id: TaskId,
        /// The project owning the task.
        project_id: ProjectId,
        /// The user who joined.
        user_id: UserId,
    },
    /// A participant was removed from a task.
    ParticipantRemoved {
        /// The task ID.
        task_id: TaskId,
        /// The project owning the task.
        project_id: ProjectId,
        /// The user who left.
        user_id: UserId,
    },
}

impl TaskEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Created { .. } => EventKind::TaskCreated,
            Self::Deleted { .. } => EventKind::TaskDeleted,
            Self::ParticipantAdded { .. } => EventKind::ParticipantAdded,
            Self::ParticipantRemoved { .. } => EventKind::ParticipantRemoved,
        }
    }

    /// The task this event is about.
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Created { task_id, .. }
            | Self::Deleted { task_id, .. }
            | Self::ParticipantAdded { task_id, .. }
            | Self::ParticipantRemoved { task_id, .. } => *task_id,
        }
    }

    /// The project owning the task.
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Created { project_id, .. }
            | Self::Deleted { project_id, .. }
            | Self::ParticipantAdded { project_id, .. }
            | Self::ParticipantRemoved { project_id, .. } => *project_id,
        }
    }
}
