//! Task lifecycle and membership.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use docflow_core::config::ConsistencyConfig;
use docflow_core::error::AppError;
use docflow_core::events::{DomainEvent, TaskEvent};
use docflow_core::result::AppResult;
use docflow_core::types::{ProjectId, TaskId, UserId};
use docflow_database::AggregateRepository;
use docflow_entity::Task;
use docflow_events::EventBus;

use crate::context::RequestContext;
use crate::retry::retry_on_conflict;

/// Data for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Task name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Task administrator; defaults to the acting user.
    pub administrator_id: Option<UserId>,
    /// Initial participants.
    #[serde(default)]
    pub participant_ids: Vec<UserId>,
}

/// Creates and deletes tasks and manages their participants.
#[derive(Debug, Clone)]
pub struct TaskService {
    /// Aggregate repository.
    repository: Arc<dyn AggregateRepository>,
    /// Domain event bus.
    bus: Arc<EventBus>,
    /// Retry policy for membership edits racing summary refreshes.
    policy: ConsistencyConfig,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(
        repository: Arc<dyn AggregateRepository>,
        bus: Arc<EventBus>,
        policy: ConsistencyConfig,
    ) -> Self {
        Self {
            repository,
            bus,
            policy,
        }
    }

    /// Creates a task in a project.
    pub async fn create_task(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        req: CreateTaskRequest,
    ) -> AppResult<Task> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Task name cannot be empty"));
        }
        self.repository.load_project(project_id).await?;

        let administrator_id = req.administrator_id.unwrap_or(ctx.user_id);
        let mut task = Task::new(project_id, name, req.description.trim(), administrator_id);
        task.participant_ids.extend(
            req.participant_ids
                .into_iter()
                .filter(|user| *user != administrator_id),
        );
        let task = self.repository.insert_task(&task).await?;

        info!(
            user_id = %ctx.user_id,
            task_id = %task.id,
            project_id = %project_id,
            participants = task.participant_ids.len(),
            "Task created"
        );

        self.bus
            .publish(&DomainEvent::task(
                Some(ctx.user_id),
                TaskEvent::Created {
                    task_id: task.id,
                    project_id,
                },
            ))
            .await?;

        Ok(task)
    }

    /// Deletes a task with its files and their versions.
    pub async fn delete_task(&self, ctx: &RequestContext, task_id: TaskId) -> AppResult<()> {
        let task = self.repository.load_task(task_id).await?;
        let number_of_files = delete_task_cascade(self.repository.as_ref(), task_id).await?;

        info!(
            user_id = %ctx.user_id,
            task_id = %task_id,
            project_id = %task.project_id,
            files = number_of_files,
            "Task deleted"
        );

        self.bus
            .publish(&DomainEvent::task(
                Some(ctx.user_id),
                TaskEvent::Deleted {
                    task_id,
                    project_id: task.project_id,
                    number_of_files,
                },
            ))
            .await?;

        Ok(())
    }

    /// Adds a participant. Adding someone already involved is a no-op.
    pub async fn add_participant(
        &self,
        ctx: &RequestContext,
        task_id: TaskId,
        user_id: UserId,
    ) -> AppResult<Task> {
        let (task, changed) = retry_on_conflict(&self.policy, format!("task {task_id}"), move || {
            self.edit_membership(task_id, move |task| {
                !task.involves(user_id) && task.participant_ids.insert(user_id)
            })
        })
        .await?;

        if changed {
            info!(user_id = %ctx.user_id, task_id = %task_id, participant = %user_id, "Participant added");
            self.bus
                .publish(&DomainEvent::task(
                    Some(ctx.user_id),
                    TaskEvent::ParticipantAdded {
                        task_id,
                        project_id: task.project_id,
                        user_id,
                    },
                ))
                .await?;
        }
        Ok(task)
    }

    /// Removes a participant. Removing a non-participant is a no-op.
    pub async fn remove_participant(
        &self,
        ctx: &RequestContext,
        task_id: TaskId,
        user_id: UserId,
    ) -> AppResult<Task> {
        let (task, changed) = retry_on_conflict(&self.policy, format!("task {task_id}"), move || {
            self.edit_membership(task_id, move |task| task.participant_ids.remove(&user_id))
        })
        .await?;

        if changed {
            info!(user_id = %ctx.user_id, task_id = %task_id, participant = %user_id, "Participant removed");
            self.bus
                .publish(&DomainEvent::task(
                    Some(ctx.user_id),
                    TaskEvent::ParticipantRemoved {
                        task_id,
                        project_id: task.project_id,
                        user_id,
                    },
                ))
                .await?;
        }
        Ok(task)
    }

    /// Gets a task.
    pub async fn get_task(&self, task_id: TaskId) -> AppResult<Task> {
        self.repository.load_task(task_id).await
    }

    async fn edit_membership(
        &self,
        task_id: TaskId,
        edit: impl FnOnce(&mut Task) -> bool,
    ) -> AppResult<(Task, bool)> {
        let mut task = self.repository.load_task(task_id).await?;
        if !edit(&mut task) {
            return Ok((task, false));
        }
        let saved = self.repository.save_task(&task).await?;
        Ok((saved, true))
    }
}

/// Removes a task's versions, files and then the task. Every step is
/// idempotent. Returns how many files were removed.
pub(crate) async fn delete_task_cascade(
    repository: &dyn AggregateRepository,
    task_id: TaskId,
) -> AppResult<u64> {
    let files = repository.files_of_task(task_id).await?;
    for file in &files {
        repository.delete_versions_of_file(file.id).await?;
    }
    let mut removed = 0u64;
    for file in &files {
        if repository.delete_file(file.id).await? {
            removed += 1;
        }
    }
    repository.delete_task(task_id).await?;
    Ok(removed)
}
