//! File-related domain events.

use serde::{Deserialize, Serialize};

use super::EventKind;
use crate::types::{FileId, ProjectId, TaskId, VersionId};

/// Events related to files and their versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileEvent {
    /// A file was created with its initial version.
    Created {
        /// The file ID.
        file_id: FileId,
        /// The task owning the file.
        task_id: TaskId,
        /// The project owning the task.
        project_id: ProjectId,
    },
    /// A file and its versions were deleted.
    Deleted {
        /// The file ID (no longer resolvable).
        file_id: FileId,
        /// The task that owned the file.
        task_id: TaskId,
        /// The project owning the task.
        project_id: ProjectId,
    },
    /// A new version was appended to a file.
    VersionCreated {
        /// The file ID.
        file_id: FileId,
        /// The new version ID.
        version_id: VersionId,
        /// The task owning the file.
        task_id: TaskId,
        /// The project owning the task.
        project_id: ProjectId,
    },
}

impl FileEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Created { .. } => EventKind::FileCreated,
            Self::Deleted { .. } => EventKind::FileDeleted,
            Self::VersionCreated { .. } => EventKind::VersionCreated,
        }
    }

    /// The file this event is about.
    pub fn file_id(&self) -> FileId {
        match self {
            Self::Created { file_id, .. }
            | Self::Deleted { file_id, .. }
            | Self::VersionCreated { file_id, .. } => *file_id,
        }
    }

    /// The task owning the file.
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Created { task_id, .. }
            | Self::Deleted { task_id, .. }
            | Self::VersionCreated { task_id, .. } => *task_id,
        }
    }

    /// The project owning the file's task.
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::Created { project_id, .. }
            | Self::Deleted { project_id, .. }
            | Self::VersionCreated { project_id, .. } => *project_id,
        }
    }
}
