//! Project lifecycle and project read models.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::types::{FileId, ProjectId, UserId};
use docflow_database::AggregateRepository;
use docflow_entity::{FileSummary, Project, ProjectInfo, ProjectSummary, Task};

use crate::consistency::ConsistencyMaintainer;
use crate::context::RequestContext;
use crate::task::service::delete_task_cascade;

/// Data for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

/// Creates, deletes and describes projects.
#[derive(Debug, Clone)]
pub struct ProjectService {
    /// Aggregate repository.
    repository: Arc<dyn AggregateRepository>,
    /// Summary maintainer, for explicit reconciliation.
    maintainer: Arc<ConsistencyMaintainer>,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(
        repository: Arc<dyn AggregateRepository>,
        maintainer: Arc<ConsistencyMaintainer>,
    ) -> Self {
        Self {
            repository,
            maintainer,
        }
    }

    /// Creates a project administered by the acting user.
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        req: CreateProjectRequest,
    ) -> AppResult<Project> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Project name cannot be empty"));
        }

        let project = Project::new(name, req.description.trim(), ctx.user_id);
        let project = self.repository.insert_project(&project).await?;

        info!(user_id = %ctx.user_id, project_id = %project.id, "Project created");
        Ok(project)
    }

    /// Deletes a project with all its tasks, files and versions.
    ///
    /// Each step is idempotent, so a failed deletion can simply be re-run.
    /// No events are published: nothing outside the project summarizes it.
    pub async fn delete_project(&self, ctx: &RequestContext, project_id: ProjectId) -> AppResult<()> {
        self.repository.load_project(project_id).await?;

        let tasks = self.repository.tasks_of_project(project_id).await?;
        let mut files = 0u64;
        for task in &tasks {
            files += delete_task_cascade(self.repository.as_ref(), task.id).await?;
        }
        self.repository.delete_project(project_id).await?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            tasks = tasks.len(),
            files = files,
            "Project deleted"
        );
        Ok(())
    }

    /// Gets a project with its tasks, most recently active first.
    ///
    /// A task's activity is the save date of its last-modified file, or its
    /// creation date when it has no files.
    pub async fn project_info(&self, project_id: ProjectId) -> AppResult<ProjectInfo> {
        let project = self.repository.load_project(project_id).await?;
        let tasks = self.repository.tasks_of_project(project_id).await?;

        let mut ranked = Vec::with_capacity(tasks.len());
        for task in tasks {
            let activity = self.task_activity(&task).await?;
            ranked.push((activity, task));
        }
        ranked.sort_by_key(|(activity, task)| Reverse((*activity, task.id)));

        Ok(ProjectInfo {
            project,
            tasks: ranked.into_iter().map(|(_, task)| task).collect(),
        })
    }

    /// Summaries of the projects a user administers or takes part in
    /// through any task, newest first.
    pub async fn participated_projects(&self, user_id: UserId) -> AppResult<Vec<ProjectSummary>> {
        let mut summaries = Vec::new();
        for project in self.repository.list_projects().await? {
            let involved = project.administrator_id == user_id
                || self
                    .repository
                    .tasks_of_project(project.id)
                    .await?
                    .iter()
                    .any(|task| task.involves(user_id));
            if !involved {
                continue;
            }
            let last_modified = self.file_summary(project.last_modified_file_id).await?;
            summaries.push(ProjectSummary::from_project(&project, last_modified));
        }
        summaries.sort_by_key(|s| Reverse((s.creation_date, s.id)));
        Ok(summaries)
    }

    /// Summary of a single project with its last-modified file resolved.
    pub async fn project_summary(&self, project_id: ProjectId) -> AppResult<ProjectSummary> {
        let project = self.repository.load_project(project_id).await?;
        let last_modified = self.file_summary(project.last_modified_file_id).await?;
        Ok(ProjectSummary::from_project(&project, last_modified))
    }

    /// Recomputes every summary of a project from persisted state.
    pub async fn reconcile_project(&self, project_id: ProjectId) -> AppResult<Project> {
        self.maintainer
            .reconcile_project(project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))
    }

    async fn task_activity(&self, task: &Task) -> AppResult<DateTime<Utc>> {
        let Some(file_id) = task.last_modified_file_id else {
            return Ok(task.creation_date);
        };
        Ok(self
            .repository
            .find_file(file_id)
            .await?
            .and_then(|file| file.last_modified())
            .unwrap_or(task.creation_date))
    }

    async fn file_summary(&self, file_id: Option<FileId>) -> AppResult<Option<FileSummary>> {
        let Some(file_id) = file_id else {
            return Ok(None);
        };
        Ok(self
            .repository
            .find_file(file_id)
            .await?
            .map(|file| file.summary()))
    }
}
