//! In-memory aggregate repository using `dashmap`.
//!
//! Each aggregate type lives in its own map. Revision checks happen while
//! the entry's shard lock is held, so a compare-and-swap on one aggregate
//! is atomic with respect to concurrent saves of the same aggregate.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::types::{FileId, ProjectId, TaskId};
use docflow_entity::{FileMetadata, Project, Task, Version};

use crate::repository::AggregateRepository;

/// Process-local repository. Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    projects: Arc<DashMap<ProjectId, Project>>,
    tasks: Arc<DashMap<TaskId, Task>>,
    files: Arc<DashMap<FileId, FileMetadata>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn stale(what: &str, id: impl std::fmt::Display, stored: u64, given: u64) -> AppError {
    warn!(
        aggregate = what,
        id = %id,
        stored_revision = stored,
        given_revision = given,
        "Rejected stale snapshot"
    );
    AppError::conflict(format!(
        "{what} {id} was modified concurrently (stored revision {stored}, snapshot revision {given})"
    ))
}

#[async_trait]
impl AggregateRepository for MemoryRepository {
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self.projects.get(&id).map(|p| p.clone()))
    }

    async fn find_task(&self, id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.get(&id).map(|t| t.clone()))
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<FileMetadata>> {
        Ok(self.files.get(&id).map(|f| f.clone()))
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.iter().map(|p| p.clone()).collect();
        projects.sort_by_key(|p| (p.creation_date, p.id));
        Ok(projects)
    }

    async fn tasks_of_project(&self, project_id: ProjectId) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(|t| t.clone())
            .collect();
        tasks.sort_by_key(|t| (t.creation_date, t.id));
        Ok(tasks)
    }

    async fn files_of_task(&self, task_id: TaskId) -> AppResult<Vec<FileMetadata>> {
        let mut files: Vec<FileMetadata> = self
            .files
            .iter()
            .filter(|f| f.task_id == task_id)
            .map(|f| f.clone())
            .collect();
        files.sort_by_key(|f| f.id);
        Ok(files)
    }

    async fn insert_project(&self, project: &Project) -> AppResult<Project> {
        match self.projects.entry(project.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Project {} already exists",
                project.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(project.clone());
                debug!(project_id = %project.id, "Project inserted");
                Ok(project.clone())
            }
        }
    }

    async fn insert_task(&self, task: &Task) -> AppResult<Task> {
        match self.tasks.entry(task.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Task {} already exists",
                task.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(task.clone());
                debug!(task_id = %task.id, project_id = %task.project_id, "Task inserted");
                Ok(task.clone())
            }
        }
    }

    async fn insert_file(&self, file: &FileMetadata) -> AppResult<FileMetadata> {
        match self.files.entry(file.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "File {} already exists",
                file.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(file.clone());
                debug!(file_id = %file.id, task_id = %file.task_id, "File inserted");
                Ok(file.clone())
            }
        }
    }

    async fn save_project(&self, project: &Project) -> AppResult<Project> {
        let mut stored = self
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| AppError::not_found(format!("Project {} not found", project.id)))?;

        if stored.revision != project.revision {
            return Err(stale("Project", project.id, stored.revision, project.revision));
        }

        let mut saved = project.clone();
        saved.revision += 1;
        *stored = saved.clone();
        Ok(saved)
    }

    async fn save_task(&self, task: &Task) -> AppResult<Task> {
        let mut stored = self
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| AppError::not_found(format!("Task {} not found", task.id)))?;

        if stored.revision != task.revision {
            return Err(stale("Task", task.id, stored.revision, task.revision));
        }

        let mut saved = task.clone();
        saved.revision += 1;
        *stored = saved.clone();
        Ok(saved)
    }

    async fn save_file(&self, file: &FileMetadata) -> AppResult<FileMetadata> {
        let mut stored = self
            .files
            .get_mut(&file.id)
            .ok_or_else(|| AppError::not_found(format!("File {} not found", file.id)))?;

        let versions = std::mem::take(&mut stored.versions);
        *stored = FileMetadata {
            versions,
            ..file.clone()
        };
        Ok(stored.clone())
    }

    async fn append_version(&self, version: &Version) -> AppResult<FileMetadata> {
        let mut stored = self.files.get_mut(&version.file_id).ok_or_else(|| {
            AppError::not_found(format!("File {} not found", version.file_id))
        })?;

        if stored.versions.iter().any(|v| v.id == version.id) {
            return Err(AppError::conflict(format!(
                "Version {} already exists",
                version.id
            )));
        }
        stored.versions.push(version.clone());
        debug!(
            file_id = %version.file_id,
            version_id = %version.id,
            versions = stored.versions.len(),
            "Version appended"
        );
        Ok(stored.clone())
    }

    async fn delete_versions_of_file(&self, file_id: FileId) -> AppResult<u64> {
        Ok(self
            .files
            .get_mut(&file_id)
            .map(|mut file| std::mem::take(&mut file.versions).len() as u64)
            .unwrap_or(0))
    }

    async fn delete_file(&self, file_id: FileId) -> AppResult<bool> {
        Ok(self.files.remove(&file_id).is_some())
    }

    async fn delete_task(&self, task_id: TaskId) -> AppResult<bool> {
        Ok(self.tasks.remove(&task_id).is_some())
    }

    async fn delete_project(&self, project_id: ProjectId) -> AppResult<bool> {
        Ok(self.projects.remove(&project_id).is_some())
    }
}
