//! Replay CLI command: run a JSON workflow script against an in-memory
//! store and report the resulting project summaries.
//!
//! ```json
//! { "steps": [
//!   { "action": "create_project", "as": "alice", "project": "p", "name": "Thesis" },
//!   { "action": "create_task", "as": "alice", "project": "p", "task": "t", "name": "Draft" },
//!   { "action": "create_file", "as": "bob", "task": "t", "file": "f",
//!     "name": "intro.txt", "content": "a\nb\n" }
//! ] }
//! ```
//!
//! Users, projects, tasks and files are referred to by script-local aliases.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::info;

use crate::output::{self, OutputFormat};
use docflow_core::config::AppConfig;
use docflow_core::error::{AppError, ErrorKind};
use docflow_core::types::{FileId, ProjectId, TaskId, UserId};
use docflow_database::MemoryRepository;
use docflow_entity::ProjectSummary;
use docflow_service::context::RequestContext;
use docflow_service::file::{AddVersionRequest, CreateFileRequest};
use docflow_service::project::CreateProjectRequest;
use docflow_service::task::CreateTaskRequest;
use docflow_service::AppServices;

/// Arguments for the replay command
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Path to the JSON script
    pub script: PathBuf,

    /// Recompute every project from scratch afterwards and report any
    /// summary that differs from the event-maintained one
    #[arg(long)]
    pub verify: bool,
}

/// A workflow script.
#[derive(Debug, Deserialize)]
struct Script {
    steps: Vec<Step>,
}

/// One scripted user action.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    CreateProject {
        #[serde(rename = "as")]
        actor: String,
        project: String,
        name: String,
        #[serde(default)]
        description: String,
    },
    DeleteProject {
        #[serde(rename = "as")]
        actor: String,
        project: String,
    },
    CreateTask {
        #[serde(rename = "as")]
        actor: String,
        project: String,
        task: String,
        name: String,
        #[serde(default)]
        description: String,
        administrator: Option<String>,
        #[serde(default)]
        participants: Vec<String>,
    },
    DeleteTask {
        #[serde(rename = "as")]
        actor: String,
        task: String,
    },
    AddParticipant {
        #[serde(rename = "as")]
        actor: String,
        task: String,
        user: String,
    },
    RemoveParticipant {
        #[serde(rename = "as")]
        actor: String,
        task: String,
        user: String,
    },
    CreateFile {
        #[serde(rename = "as")]
        actor: String,
        task: String,
        file: String,
        name: String,
        #[serde(default)]
        description: String,
        content: String,
        #[serde(default = "default_version")]
        version: String,
        #[serde(default)]
        message: String,
    },
    AddVersion {
        #[serde(rename = "as")]
        actor: String,
        file: String,
        content: String,
        version: String,
        #[serde(default)]
        message: String,
    },
    MarkToConfirm {
        #[serde(rename = "as")]
        actor: String,
        file: String,
    },
    Confirm {
        #[serde(rename = "as")]
        actor: String,
        file: String,
    },
    DeleteFile {
        #[serde(rename = "as")]
        actor: String,
        file: String,
    },
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Project summary display row
#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    /// Project name
    name: String,
    /// Task count
    tasks: u64,
    /// File count
    files: u64,
    /// Participant count
    participants: u64,
    /// Last modified file
    last_modified: String,
}

impl From<&ProjectSummary> for ProjectRow {
    fn from(summary: &ProjectSummary) -> Self {
        Self {
            name: summary.name.clone(),
            tasks: summary.number_of_tasks,
            files: summary.number_of_files,
            participants: summary.number_of_participants,
            last_modified: summary
                .last_modified_file
                .as_ref()
                .map(|f| f.name.clone())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Alias tables for one replay.
#[derive(Debug, Default)]
struct Aliases {
    users: HashMap<String, UserId>,
    projects: HashMap<String, ProjectId>,
    tasks: HashMap<String, TaskId>,
    files: HashMap<String, FileId>,
}

impl Aliases {
    /// Users come into existence on first mention.
    fn user(&mut self, alias: &str) -> UserId {
        *self
            .users
            .entry(alias.to_string())
            .or_insert_with(UserId::new)
    }

    fn ctx(&mut self, alias: &str) -> RequestContext {
        RequestContext::new(self.user(alias))
    }

    fn project(&self, alias: &str) -> Result<ProjectId, AppError> {
        lookup(&self.projects, "project", alias)
    }

    fn task(&self, alias: &str) -> Result<TaskId, AppError> {
        lookup(&self.tasks, "task", alias)
    }

    fn file(&self, alias: &str) -> Result<FileId, AppError> {
        lookup(&self.files, "file", alias)
    }
}

fn lookup<T: Copy>(table: &HashMap<String, T>, kind: &str, alias: &str) -> Result<T, AppError> {
    table
        .get(alias)
        .copied()
        .ok_or_else(|| AppError::validation(format!("Unknown {kind} alias '{alias}'")))
}

/// Execute the replay command
pub async fn execute(
    args: &ReplayArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let raw = tokio::fs::read(&args.script).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read script '{}'", args.script.display()),
            e,
        )
    })?;
    let script: Script = serde_json::from_slice(&raw)?;

    let services = AppServices::build(config, Arc::new(MemoryRepository::new())).await;
    let mut aliases = Aliases::default();

    for (index, step) in script.steps.into_iter().enumerate() {
        run_step(&services, &mut aliases, step).await.map_err(|e| {
            AppError::new(e.kind, format!("Step #{}: {}", index + 1, e.message))
        })?;
    }
    info!(
        projects = aliases.projects.len(),
        tasks = aliases.tasks.len(),
        files = aliases.files.len(),
        "Script replayed"
    );

    let mut summaries = Vec::new();
    for project in services.repository.list_projects().await? {
        summaries.push(services.projects.project_summary(project.id).await?);
    }

    let rows: Vec<ProjectRow> = summaries.iter().map(ProjectRow::from).collect();
    output::print_list(&rows, format)?;

    if args.verify {
        verify(&services, &summaries).await?;
    }
    Ok(())
}

async fn verify(services: &AppServices, summaries: &[ProjectSummary]) -> Result<(), AppError> {
    let mut drifted = 0usize;
    for summary in summaries {
        services.projects.reconcile_project(summary.id).await?;
        let recomputed = services.projects.project_summary(summary.id).await?;
        if recomputed != *summary {
            drifted += 1;
            output::print_warning(&format!(
                "Project '{}' drifted: maintained {:?}, recomputed {:?}",
                summary.name,
                ProjectRow::from(summary),
                ProjectRow::from(&recomputed)
            ));
        }
    }

    if drifted > 0 {
        return Err(AppError::invariant_violation(format!(
            "{drifted} project summary(ies) differed from a full recompute"
        )));
    }
    output::print_success("All project summaries match a full recompute");
    Ok(())
}

async fn run_step(
    services: &AppServices,
    aliases: &mut Aliases,
    step: Step,
) -> Result<(), AppError> {
    match step {
        Step::CreateProject {
            actor,
            project,
            name,
            description,
        } => {
            let ctx = aliases.ctx(&actor);
            let created = services
                .projects
                .create_project(&ctx, CreateProjectRequest { name, description })
                .await?;
            aliases.projects.insert(project, created.id);
        }
        Step::DeleteProject { actor, project } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.project(&project)?;
            services.projects.delete_project(&ctx, id).await?;
        }
        Step::CreateTask {
            actor,
            project,
            task,
            name,
            description,
            administrator,
            participants,
        } => {
            let ctx = aliases.ctx(&actor);
            let project_id = aliases.project(&project)?;
            let administrator_id = administrator.map(|a| aliases.user(&a));
            let participant_ids = participants.iter().map(|p| aliases.user(p)).collect();
            let created = services
                .tasks
                .create_task(
                    &ctx,
                    project_id,
                    CreateTaskRequest {
                        name,
                        description,
                        administrator_id,
                        participant_ids,
                    },
                )
                .await?;
            aliases.tasks.insert(task, created.id);
        }
        Step::DeleteTask { actor, task } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.task(&task)?;
            services.tasks.delete_task(&ctx, id).await?;
        }
        Step::AddParticipant { actor, task, user } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.task(&task)?;
            let user_id = aliases.user(&user);
            services.tasks.add_participant(&ctx, id, user_id).await?;
        }
        Step::RemoveParticipant { actor, task, user } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.task(&task)?;
            let user_id = aliases.user(&user);
            services.tasks.remove_participant(&ctx, id, user_id).await?;
        }
        Step::CreateFile {
            actor,
            task,
            file,
            name,
            description,
            content,
            version,
            message,
        } => {
            let ctx = aliases.ctx(&actor);
            let task_id = aliases.task(&task)?;
            let created = services
                .files
                .create_file(
                    &ctx,
                    task_id,
                    CreateFileRequest {
                        name,
                        description,
                        content: Bytes::from(content),
                        version_string: version,
                        message,
                    },
                )
                .await?;
            aliases.files.insert(file, created.id);
        }
        Step::AddVersion {
            actor,
            file,
            content,
            version,
            message,
        } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.file(&file)?;
            services
                .files
                .add_version(
                    &ctx,
                    id,
                    AddVersionRequest {
                        content: Bytes::from(content),
                        version_string: version,
                        message,
                    },
                )
                .await?;
        }
        Step::MarkToConfirm { actor, file } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.file(&file)?;
            services.files.mark_to_confirm(&ctx, id).await?;
        }
        Step::Confirm { actor, file } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.file(&file)?;
            services.files.confirm(&ctx, id).await?;
        }
        Step::DeleteFile { actor, file } => {
            let ctx = aliases.ctx(&actor);
            let id = aliases.file(&file)?;
            services.files.delete_file(&ctx, id).await?;
        }
    }
    Ok(())
}
