//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;

use docflow_core::config::{AppConfig, ConsistencyConfig};
use docflow_core::types::{FileId, ProjectId, TaskId, UserId};
use docflow_database::{AggregateRepository, MemoryRepository};
use docflow_entity::{FileMetadata, Project, Task, Version};
use docflow_service::AppServices;
use docflow_service::context::RequestContext;
use docflow_service::file::{AddVersionRequest, CreateFileRequest};
use docflow_service::project::CreateProjectRequest;
use docflow_service::task::CreateTaskRequest;

/// Test application context
pub struct TestApp {
    /// Fully wired services
    pub services: AppServices,
    /// Repository for direct inspection
    pub repository: Arc<MemoryRepository>,
    /// Project administrator used by the helpers
    pub admin: UserId,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub async fn new() -> Self {
        let config = AppConfig {
            consistency: ConsistencyConfig {
                max_retries: 50,
                retry_backoff_ms: 1,
            },
            ..AppConfig::default()
        };
        Self::with_config(config).await
    }

    /// Create a test application with a specific configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let repository = Arc::new(MemoryRepository::new());
        let services = AppServices::build(&config, repository.clone()).await;
        Self {
            services,
            repository,
            admin: UserId::new(),
        }
    }

    /// Request context of the helper administrator
    pub fn admin_ctx(&self) -> RequestContext {
        RequestContext::new(self.admin)
    }

    /// Create a project administered by `self.admin`
    pub async fn create_project(&self, name: &str) -> Project {
        self.services
            .projects
            .create_project(
                &self.admin_ctx(),
                CreateProjectRequest {
                    name: name.to_string(),
                    description: String::new(),
                },
            )
            .await
            .expect("create project")
    }

    /// Create a task administered by `administrator`
    pub async fn create_task(
        &self,
        project_id: ProjectId,
        name: &str,
        administrator: UserId,
        participants: Vec<UserId>,
    ) -> Task {
        self.services
            .tasks
            .create_task(
                &self.admin_ctx(),
                project_id,
                CreateTaskRequest {
                    name: name.to_string(),
                    description: String::new(),
                    administrator_id: Some(administrator),
                    participant_ids: participants,
                },
            )
            .await
            .expect("create task")
    }

    /// Create a text file in a task
    pub async fn create_file(&self, task_id: TaskId, name: &str, content: &str) -> FileMetadata {
        self.services
            .files
            .create_file(
                &self.admin_ctx(),
                task_id,
                CreateFileRequest {
                    name: name.to_string(),
                    description: String::new(),
                    content: Bytes::from(content.to_string()),
                    version_string: "1.0".to_string(),
                    message: "initial".to_string(),
                },
            )
            .await
            .expect("create file")
    }

    /// Append a version to a file
    pub async fn add_version(&self, file_id: FileId, version: &str, content: &str) -> Version {
        self.services
            .files
            .add_version(
                &self.admin_ctx(),
                file_id,
                AddVersionRequest {
                    content: Bytes::from(content.to_string()),
                    version_string: version.to_string(),
                    message: String::new(),
                },
            )
            .await
            .expect("add version")
    }

    /// Current stored project
    pub async fn project(&self, id: ProjectId) -> Project {
        self.repository.load_project(id).await.expect("load project")
    }

    /// Current stored task
    pub async fn task(&self, id: TaskId) -> Task {
        self.repository.load_task(id).await.expect("load task")
    }

    /// Assert that event-maintained summaries equal a full recompute
    pub async fn assert_converged(&self, project_id: ProjectId) {
        let maintained = self.project(project_id).await;
        let tasks = self
            .repository
            .tasks_of_project(project_id)
            .await
            .expect("tasks");

        let mut total_files = 0u64;
        let mut maintained_tasks = Vec::new();
        for task in &tasks {
            let files = self.repository.files_of_task(task.id).await.expect("files");
            assert_eq!(
                task.number_of_files,
                files.len() as u64,
                "task {} file count",
                task.name
            );
            total_files += files.len() as u64;
            maintained_tasks.push((task.id, task.number_of_files, task.last_modified_file_id));
        }
        assert_eq!(maintained.number_of_tasks, tasks.len() as u64);
        assert_eq!(maintained.number_of_files, total_files);

        let recomputed = self
            .services
            .maintainer
            .reconcile_project(project_id)
            .await
            .expect("reconcile")
            .expect("project exists");
        assert_eq!(recomputed.number_of_tasks, maintained.number_of_tasks);
        assert_eq!(recomputed.number_of_files, maintained.number_of_files);
        assert_eq!(
            recomputed.number_of_participants,
            maintained.number_of_participants
        );
        assert_eq!(
            recomputed.last_modified_file_id,
            maintained.last_modified_file_id
        );
        for (task_id, files, last_modified) in maintained_tasks {
            let task = self.task(task_id).await;
            assert_eq!(task.number_of_files, files);
            assert_eq!(task.last_modified_file_id, last_modified);
        }
    }
}
