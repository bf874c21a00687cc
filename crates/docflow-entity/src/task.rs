//! Task aggregate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::types::{FileId, ProjectId, TaskId, UserId};

/// A unit of work inside a project. Owns files.
///
/// `number_of_files` and `last_modified_file_id` are denormalized and kept
/// correct by the consistency handlers, never by the code that edits
/// files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// When the task was created.
    pub creation_date: DateTime<Utc>,
    /// Task administrator.
    pub administrator_id: UserId,
    /// Users taking part in the task (administrator not included).
    pub participant_ids: BTreeSet<UserId>,
    /// File whose latest version is the newest in this task.
    pub last_modified_file_id: Option<FileId>,
    /// Number of files in this task.
    pub number_of_files: u64,
    /// Optimistic concurrency revision, bumped by every save.
    pub revision: u64,
}

impl Task {
    /// Create an empty task.
    pub fn new(
        project_id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        administrator_id: UserId,
    ) -> Self {
        Self {
            id: TaskId::new(),
            project_id,
            name: name.into(),
            description: description.into(),
            creation_date: Utc::now(),
            administrator_id,
            participant_ids: BTreeSet::new(),
            last_modified_file_id: None,
            number_of_files: 0,
            revision: 0,
        }
    }

    /// Everyone involved in the task: administrator plus participants.
    pub fn members(&self) -> impl Iterator<Item = UserId> + '_ {
        std::iter::once(self.administrator_id).chain(self.participant_ids.iter().copied())
    }

    /// Whether `user_id` administers or takes part in this task.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.administrator_id == user_id || self.participant_ids.contains(&user_id)
    }
}
