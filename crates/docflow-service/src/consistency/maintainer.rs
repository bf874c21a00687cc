//! Read, recompute and save cycles for Task and Project summaries.

use std::sync::Arc;

use tracing::{debug, info, warn};

use docflow_core::config::ConsistencyConfig;
use docflow_core::result::AppResult;
use docflow_core::types::{ProjectId, TaskId};
use docflow_database::AggregateRepository;
use docflow_entity::{Project, Task};

use super::recompute::{ProjectTotals, TaskTotals};
use crate::retry::retry_on_conflict;

/// Keeps denormalized summaries on Task and Project aggregates in line with
/// the persisted tasks, files and versions.
///
/// Every refresh re-derives the summary from the repository and saves it
/// with a revision check, even when nothing changed, so that any writer
/// holding an older snapshot loses the race and re-reads. A lost race is
/// retried per the configured policy. A refresh of an aggregate that no
/// longer exists succeeds with `None`.
#[derive(Debug, Clone)]
pub struct ConsistencyMaintainer {
    repository: Arc<dyn AggregateRepository>,
    policy: ConsistencyConfig,
}

impl ConsistencyMaintainer {
    /// Creates a new maintainer.
    pub fn new(repository: Arc<dyn AggregateRepository>, policy: ConsistencyConfig) -> Self {
        Self { repository, policy }
    }

    /// Recompute a task's file count and last-modified file.
    pub async fn refresh_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        retry_on_conflict(&self.policy, format!("task {task_id}"), move || {
            self.refresh_task_once(task_id)
        })
        .await
    }

    /// Recompute a project's task, file and participant counts and its
    /// last-modified file.
    pub async fn refresh_project(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        retry_on_conflict(&self.policy, format!("project {project_id}"), move || {
            self.refresh_project_once(project_id)
        })
        .await
    }

    /// Refresh every task of a project and then the project itself.
    ///
    /// Recovery path for summaries left behind by a failed dispatch.
    pub async fn reconcile_project(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        let tasks = self.repository.tasks_of_project(project_id).await?;
        for task in &tasks {
            self.refresh_task(task.id).await?;
        }
        let project = self.refresh_project(project_id).await?;

        info!(
            project_id = %project_id,
            tasks = tasks.len(),
            found = project.is_some(),
            "Project reconciled"
        );
        Ok(project)
    }

    async fn refresh_task_once(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        // Aggregate before sources: whoever saves after this read also read
        // the sources after us, so the last successful save is never stale.
        let Some(mut task) = self.repository.find_task(task_id).await? else {
            warn!(task_id = %task_id, "Task vanished, nothing to maintain");
            return Ok(None);
        };
        let files = self.repository.files_of_task(task_id).await?;
        let totals = TaskTotals::from_files(&files);
        let changed = !totals.matches(&task);

        totals.apply(&mut task);
        let saved = self.repository.save_task(&task).await?;
        debug!(
            task_id = %task_id,
            changed = changed,
            number_of_files = saved.number_of_files,
            last_modified_file_id = ?saved.last_modified_file_id,
            revision = saved.revision,
            "Task summary saved"
        );
        Ok(Some(saved))
    }

    async fn refresh_project_once(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        let Some(mut project) = self.repository.find_project(project_id).await? else {
            warn!(project_id = %project_id, "Project vanished, nothing to maintain");
            return Ok(None);
        };
        let tasks = self.repository.tasks_of_project(project_id).await?;
        let mut files = Vec::new();
        for task in &tasks {
            files.extend(self.repository.files_of_task(task.id).await?);
        }
        let totals = ProjectTotals::from_sources(&project, &tasks, &files);
        let changed = !totals.matches(&project);

        totals.apply(&mut project);
        let saved = self.repository.save_project(&project).await?;
        debug!(
            project_id = %project_id,
            changed = changed,
            number_of_tasks = saved.number_of_tasks,
            number_of_files = saved.number_of_files,
            number_of_participants = saved.number_of_participants,
            last_modified_file_id = ?saved.last_modified_file_id,
            revision = saved.revision,
            "Project summary saved"
        );
        Ok(Some(saved))
    }
}
