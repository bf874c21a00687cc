//! Project aggregate and read models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::types::{FileId, ProjectId, UserId};

use crate::file::FileSummary;
use crate::task::Task;

/// Top-level container of tasks.
///
/// All counters and the last-modified pointer are denormalized summaries of
/// the project's tasks and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// When the project was created.
    pub creation_date: DateTime<Utc>,
    /// Project administrator.
    pub administrator_id: UserId,
    /// Distinct users across the project administrator and every task's
    /// administrator and participants.
    pub number_of_participants: u64,
    /// Number of tasks.
    pub number_of_tasks: u64,
    /// Number of files across all tasks.
    pub number_of_files: u64,
    /// File whose latest version is the newest in the project.
    pub last_modified_file_id: Option<FileId>,
    /// Optimistic concurrency revision, bumped by every save.
    pub revision: u64,
}

impl Project {
    /// Create an empty project administered by `administrator_id`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        administrator_id: UserId,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: description.into(),
            creation_date: Utc::now(),
            administrator_id,
            number_of_participants: 1,
            number_of_tasks: 0,
            number_of_files: 0,
            last_modified_file_id: None,
            revision: 0,
        }
    }
}

/// Project listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// When the project was created.
    pub creation_date: DateTime<Utc>,
    /// Distinct participants.
    pub number_of_participants: u64,
    /// Task count.
    pub number_of_tasks: u64,
    /// File count.
    pub number_of_files: u64,
    /// The most recently modified file, if any.
    pub last_modified_file: Option<FileSummary>,
}

impl ProjectSummary {
    /// Build a summary from a project and its resolved last-modified file.
    pub fn from_project(project: &Project, last_modified_file: Option<FileSummary>) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            creation_date: project.creation_date,
            number_of_participants: project.number_of_participants,
            number_of_tasks: project.number_of_tasks,
            number_of_files: project.number_of_files,
            last_modified_file,
        }
    }
}

/// Project details with its tasks, most recently active first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// The project snapshot.
    pub project: Project,
    /// Tasks ordered by last activity, newest first.
    pub tasks: Vec<Task>,
}
