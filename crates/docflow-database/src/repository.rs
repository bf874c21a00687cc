//! Aggregate repository trait.

use async_trait::async_trait;

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::types::{FileId, ProjectId, TaskId};
use docflow_entity::{FileMetadata, Project, Task, Version};

/// Storage for projects, tasks, files and their versions.
///
/// `save_project` and `save_task` persist a full snapshot atomically and
/// reject it with a [`Conflict`] error if the stored revision moved since
/// the snapshot was read. On success the stored revision is bumped and the
/// saved snapshot is returned.
///
/// Every `delete_*` primitive is idempotent: deleting something that is
/// already gone succeeds and reports that nothing was removed.
///
/// [`Conflict`]: docflow_core::error::ErrorKind::Conflict
#[async_trait]
pub trait AggregateRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a project by ID.
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>>;

    /// Find a task by ID.
    async fn find_task(&self, id: TaskId) -> AppResult<Option<Task>>;

    /// Find a file (with its versions) by ID.
    async fn find_file(&self, id: FileId) -> AppResult<Option<FileMetadata>>;

    /// All projects, oldest first.
    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    /// Tasks of a project, oldest first.
    async fn tasks_of_project(&self, project_id: ProjectId) -> AppResult<Vec<Task>>;

    /// Files of a task, with their versions.
    async fn files_of_task(&self, task_id: TaskId) -> AppResult<Vec<FileMetadata>>;

    /// Store a new project. Fails with a conflict if the id is taken.
    async fn insert_project(&self, project: &Project) -> AppResult<Project>;

    /// Store a new task. Fails with a conflict if the id is taken.
    async fn insert_task(&self, task: &Task) -> AppResult<Task>;

    /// Store a new file with its versions. Fails with a conflict if the id
    /// is taken.
    async fn insert_file(&self, file: &FileMetadata) -> AppResult<FileMetadata>;

    /// Persist a project snapshot read at `project.revision`.
    async fn save_project(&self, project: &Project) -> AppResult<Project>;

    /// Persist a task snapshot read at `task.revision`.
    async fn save_task(&self, task: &Task) -> AppResult<Task>;

    /// Persist file metadata. Versions are left untouched; they only change
    /// through [`append_version`](Self::append_version) and
    /// [`delete_versions_of_file`](Self::delete_versions_of_file).
    async fn save_file(&self, file: &FileMetadata) -> AppResult<FileMetadata>;

    /// Append a version to its file.
    async fn append_version(&self, version: &Version) -> AppResult<FileMetadata>;

    /// Remove every version of a file. Returns how many were removed.
    async fn delete_versions_of_file(&self, file_id: FileId) -> AppResult<u64>;

    /// Remove a file. Returns whether it existed.
    async fn delete_file(&self, file_id: FileId) -> AppResult<bool>;

    /// Remove a task. Returns whether it existed.
    async fn delete_task(&self, task_id: TaskId) -> AppResult<bool>;

    /// Remove a project. Returns whether it existed.
    async fn delete_project(&self, project_id: ProjectId) -> AppResult<bool>;

    /// Load a project or fail with `NotFound`.
    async fn load_project(&self, id: ProjectId) -> AppResult<Project> {
        self.find_project(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    /// Load a task or fail with `NotFound`.
    async fn load_task(&self, id: TaskId) -> AppResult<Task> {
        self.find_task(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))
    }

    /// Load a file or fail with `NotFound`.
    async fn load_file(&self, id: FileId) -> AppResult<FileMetadata> {
        self.find_file(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// The latest version of a file, if the file exists and has any.
    async fn latest_version(&self, file_id: FileId) -> AppResult<Option<Version>> {
        Ok(self
            .find_file(file_id)
            .await?
            .and_then(|file| file.latest_version().cloned()))
    }
}
