//! File workflow: create, add versions, confirm, delete.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use docflow_core::error::AppError;
use docflow_core::events::{DomainEvent, FileEvent};
use docflow_core::result::AppResult;
use docflow_core::types::{FileId, TaskId};
use docflow_database::AggregateRepository;
use docflow_entity::{FileMetadata, Version};
use docflow_events::EventBus;

use super::factory::{NewVersion, VersionFactory};
use crate::context::RequestContext;

/// Data for creating a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRequest {
    /// File name, including extension.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Initial content.
    pub content: Bytes,
    /// Label of the initial version.
    pub version_string: String,
    /// Message of the initial version.
    pub message: String,
}

/// Data for appending a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVersionRequest {
    /// New content.
    pub content: Bytes,
    /// Version label.
    pub version_string: String,
    /// Description of the change.
    pub message: String,
}

/// Handles the file lifecycle and publishes file events.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Aggregate repository.
    repository: Arc<dyn AggregateRepository>,
    /// Version builder.
    factory: Arc<VersionFactory>,
    /// Domain event bus.
    bus: Arc<EventBus>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        repository: Arc<dyn AggregateRepository>,
        factory: Arc<VersionFactory>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            repository,
            factory,
            bus,
        }
    }

    /// Creates a file in a task with its initial version.
    pub async fn create_file(
        &self,
        ctx: &RequestContext,
        task_id: TaskId,
        req: CreateFileRequest,
    ) -> AppResult<FileMetadata> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        let task = self.repository.load_task(task_id).await?;
        let file_id = FileId::new();
        let (extracted, initial) = self.factory.initial_version(
            file_id,
            name,
            NewVersion {
                content: req.content,
                version_string: req.version_string,
                message: req.message,
                author_id: ctx.user_id,
            },
        )?;
        let file = FileMetadata::new(
            file_id,
            task_id,
            name,
            req.description.trim(),
            extracted.content_type,
            initial,
        );
        let file = self.repository.insert_file(&file).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            task_id = %task_id,
            content_type = %file.content_type,
            lines = extracted.lines.len(),
            "File created"
        );

        self.bus
            .publish(&DomainEvent::file(
                Some(ctx.user_id),
                FileEvent::Created {
                    file_id: file.id,
                    task_id,
                    project_id: task.project_id,
                },
            ))
            .await?;

        Ok(file)
    }

    /// Appends a new version to a file, diffed against its latest version.
    pub async fn add_version(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        req: AddVersionRequest,
    ) -> AppResult<Version> {
        let file = self.repository.load_file(file_id).await?;
        let task = self.repository.load_task(file.task_id).await?;

        let version = self.factory.next_version(
            &file,
            NewVersion {
                content: req.content,
                version_string: req.version_string,
                message: req.message,
                author_id: ctx.user_id,
            },
        )?;
        self.repository.append_version(&version).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            version_id = %version.id,
            hunks = version.differences.len(),
            "File version created"
        );

        self.bus
            .publish(&DomainEvent::file(
                Some(ctx.user_id),
                FileEvent::VersionCreated {
                    file_id,
                    version_id: version.id,
                    task_id: task.id,
                    project_id: task.project_id,
                },
            ))
            .await?;

        Ok(version)
    }

    /// Asks the task administrator to confirm a draft file.
    pub async fn mark_to_confirm(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> AppResult<FileMetadata> {
        let mut file = self.repository.load_file(file_id).await?;
        file.mark_to_confirm()?;
        let file = self.repository.save_file(&file).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File marked to confirm");
        Ok(file)
    }

    /// Confirms a file that was marked to confirm.
    pub async fn confirm(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<FileMetadata> {
        let mut file = self.repository.load_file(file_id).await?;
        file.confirm()?;
        let file = self.repository.save_file(&file).await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File confirmed");
        Ok(file)
    }

    /// Deletes a file and its versions, in any confirmation state.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let file = self.repository.load_file(file_id).await?;
        let task = self.repository.load_task(file.task_id).await?;

        let versions = self.repository.delete_versions_of_file(file_id).await?;
        self.repository.delete_file(file_id).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            task_id = %task.id,
            versions = versions,
            "File deleted"
        );

        self.bus
            .publish(&DomainEvent::file(
                Some(ctx.user_id),
                FileEvent::Deleted {
                    file_id,
                    task_id: task.id,
                    project_id: task.project_id,
                },
            ))
            .await?;

        Ok(())
    }

    /// Gets a file with its versions.
    pub async fn file_info(&self, file_id: FileId) -> AppResult<FileMetadata> {
        self.repository.load_file(file_id).await
    }
}
