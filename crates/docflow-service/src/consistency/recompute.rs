//! Pure recomputation of denormalized aggregate summaries.
//!
//! Everything here derives summary values from the source collections
//! alone, so applying the result any number of times converges to the same
//! state.

use std::collections::BTreeSet;

use docflow_core::types::{FileId, UserId};
use docflow_entity::{FileMetadata, Project, Task};

/// Summary values a task keeps about its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTotals {
    /// Number of files in the task.
    pub number_of_files: u64,
    /// File with the newest latest version.
    pub last_modified_file_id: Option<FileId>,
}

impl TaskTotals {
    /// Derive the totals from the task's files.
    pub fn from_files(files: &[FileMetadata]) -> Self {
        Self {
            number_of_files: files.len() as u64,
            last_modified_file_id: last_modified_file(files),
        }
    }

    /// Whether `task` already carries these totals.
    pub fn matches(&self, task: &Task) -> bool {
        task.number_of_files == self.number_of_files
            && task.last_modified_file_id == self.last_modified_file_id
    }

    /// Write the totals into `task`.
    pub fn apply(&self, task: &mut Task) {
        task.number_of_files = self.number_of_files;
        task.last_modified_file_id = self.last_modified_file_id;
    }
}

/// Summary values a project keeps about its tasks and files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectTotals {
    /// Number of tasks in the project.
    pub number_of_tasks: u64,
    /// Number of files across all tasks.
    pub number_of_files: u64,
    /// Distinct users among the project administrator and every task's
    /// administrator and participants.
    pub number_of_participants: u64,
    /// File with the newest latest version across all tasks.
    pub last_modified_file_id: Option<FileId>,
}

impl ProjectTotals {
    /// Derive the totals from the project's tasks and all of their files.
    pub fn from_sources(project: &Project, tasks: &[Task], files: &[FileMetadata]) -> Self {
        Self {
            number_of_tasks: tasks.len() as u64,
            number_of_files: files.len() as u64,
            number_of_participants: participants(project, tasks).len() as u64,
            last_modified_file_id: last_modified_file(files),
        }
    }

    /// Whether `project` already carries these totals.
    pub fn matches(&self, project: &Project) -> bool {
        project.number_of_tasks == self.number_of_tasks
            && project.number_of_files == self.number_of_files
            && project.number_of_participants == self.number_of_participants
            && project.last_modified_file_id == self.last_modified_file_id
    }

    /// Write the totals into `project`.
    pub fn apply(&self, project: &mut Project) {
        project.number_of_tasks = self.number_of_tasks;
        project.number_of_files = self.number_of_files;
        project.number_of_participants = self.number_of_participants;
        project.last_modified_file_id = self.last_modified_file_id;
    }
}

/// The file whose latest version is newest; equal save dates resolve to the
/// greater file id. Files without versions never qualify.
pub fn last_modified_file(files: &[FileMetadata]) -> Option<FileId> {
    files
        .iter()
        .filter_map(FileMetadata::recency_key)
        .max()
        .map(|(_, id)| id)
}

/// Everyone involved in a project.
pub fn participants(project: &Project, tasks: &[Task]) -> BTreeSet<UserId> {
    std::iter::once(project.administrator_id)
        .chain(tasks.iter().flat_map(Task::members))
        .collect()
}
