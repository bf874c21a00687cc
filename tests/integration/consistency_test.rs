//! Integration tests for event-driven summary maintenance.

mod helpers;

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;

use docflow_core::error::ErrorKind;
use docflow_core::types::{FileId, TaskId, UserId};
use docflow_database::AggregateRepository;

/// Gives consecutive versions distinct save dates.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn test_new_project_counts_its_administrator() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;

    assert_eq!(project.number_of_participants, 1);
    assert_eq!(project.number_of_tasks, 0);
    assert_eq!(project.number_of_files, 0);
    assert_eq!(project.last_modified_file_id, None);
}

#[tokio::test]
async fn test_task_and_file_creation_update_summaries() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;

    let file = app.create_file(task.id, "intro.txt", "hello\nworld\n").await;

    let task = app.task(task.id).await;
    assert_eq!(task.number_of_files, 1);
    assert_eq!(task.last_modified_file_id, Some(file.id));

    let project = app.project(project.id).await;
    assert_eq!(project.number_of_tasks, 1);
    assert_eq!(project.number_of_files, 1);
    assert_eq!(project.last_modified_file_id, Some(file.id));
    app.assert_converged(project.id).await;
}

#[tokio::test]
async fn test_new_version_moves_last_modified_pointer() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;

    let first = app.create_file(task.id, "a.txt", "a\n").await;
    tick().await;
    let second = app.create_file(task.id, "b.txt", "b\n").await;
    assert_eq!(app.task(task.id).await.last_modified_file_id, Some(second.id));

    tick().await;
    app.add_version(first.id, "1.1", "a\nmore\n").await;

    assert_eq!(app.task(task.id).await.last_modified_file_id, Some(first.id));
    assert_eq!(
        app.project(project.id).await.last_modified_file_id,
        Some(first.id)
    );
    app.assert_converged(project.id).await;
}

#[tokio::test]
async fn test_deleting_task_drops_its_files_from_project() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let doomed = app.create_task(project.id, "Doomed", app.admin, vec![]).await;
    let kept = app.create_task(project.id, "Kept", app.admin, vec![]).await;

    let mut kept_files = Vec::new();
    for i in 0..2 {
        kept_files.push(app.create_file(kept.id, &format!("k{i}.txt"), "k\n").await.id);
        tick().await;
    }
    let mut doomed_files = Vec::new();
    for i in 0..3 {
        doomed_files.push(app.create_file(doomed.id, &format!("d{i}.txt"), "d\n").await.id);
        tick().await;
    }
    assert_eq!(app.project(project.id).await.number_of_files, 5);

    app.services
        .tasks
        .delete_task(&app.admin_ctx(), doomed.id)
        .await
        .unwrap();

    let project = app.project(project.id).await;
    assert_eq!(project.number_of_tasks, 1);
    assert_eq!(project.number_of_files, 2);
    assert_eq!(project.last_modified_file_id, Some(kept_files[1]));
    for id in doomed_files {
        assert!(app.repository.find_file(id).await.unwrap().is_none());
    }
    app.assert_converged(project.id).await;
}

#[tokio::test]
async fn test_deleting_last_file_clears_pointer() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "a\n").await;

    app.services
        .files
        .delete_file(&app.admin_ctx(), file.id)
        .await
        .unwrap();

    let task = app.task(task.id).await;
    assert_eq!(task.number_of_files, 0);
    assert_eq!(task.last_modified_file_id, None);
    let project = app.project(project.id).await;
    assert_eq!(project.number_of_files, 0);
    assert_eq!(project.last_modified_file_id, None);
}

#[tokio::test]
async fn test_participants_are_distinct_users() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let writer = UserId::new();
    let reviewer = UserId::new();

    let task = app
        .create_task(project.id, "Draft", writer, vec![reviewer, writer])
        .await;
    assert_eq!(task.participant_ids.len(), 1);
    assert_eq!(app.project(project.id).await.number_of_participants, 3);

    // The same people on a second task add nobody.
    app.create_task(project.id, "Review", reviewer, vec![writer])
        .await;
    assert_eq!(app.project(project.id).await.number_of_participants, 3);
    app.assert_converged(project.id).await;
}

#[tokio::test]
async fn test_membership_changes_update_participants() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let writer = UserId::new();
    let guest = UserId::new();
    let task = app.create_task(project.id, "Draft", writer, vec![]).await;
    assert_eq!(app.project(project.id).await.number_of_participants, 2);

    let ctx = app.admin_ctx();
    let task_after = app
        .services
        .tasks
        .add_participant(&ctx, task.id, guest)
        .await
        .unwrap();
    assert!(task_after.participant_ids.contains(&guest));
    assert_eq!(app.project(project.id).await.number_of_participants, 3);

    app.services
        .tasks
        .remove_participant(&ctx, task.id, guest)
        .await
        .unwrap();
    assert_eq!(app.project(project.id).await.number_of_participants, 2);
    app.assert_converged(project.id).await;
}

#[tokio::test]
async fn test_membership_noops_leave_task_untouched() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let writer = UserId::new();
    let task = app.create_task(project.id, "Draft", writer, vec![]).await;
    let before = app.task(task.id).await;

    let ctx = app.admin_ctx();
    // Administrator is already involved.
    app.services
        .tasks
        .add_participant(&ctx, task.id, writer)
        .await
        .unwrap();
    // Stranger was never a participant.
    app.services
        .tasks
        .remove_participant(&ctx, task.id, UserId::new())
        .await
        .unwrap();

    let after = app.task(task.id).await;
    assert_eq!(after.revision, before.revision);
    assert!(after.participant_ids.is_empty());
}

#[tokio::test]
async fn test_deleting_project_removes_everything() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "a\n").await;

    app.services
        .projects
        .delete_project(&app.admin_ctx(), project.id)
        .await
        .unwrap();

    assert!(app.repository.find_project(project.id).await.unwrap().is_none());
    assert!(app.repository.find_task(task.id).await.unwrap().is_none());
    assert!(app.repository.find_file(file.id).await.unwrap().is_none());

    let err = app
        .services
        .projects
        .project_summary(project.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_reconcile_repairs_drifted_summaries() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "a\n").await;

    // Corrupt both summaries behind the maintainer's back.
    let mut task_row = app.task(task.id).await;
    task_row.number_of_files = 42;
    task_row.last_modified_file_id = None;
    app.repository.save_task(&task_row).await.unwrap();
    let mut project_row = app.project(project.id).await;
    project_row.number_of_files = 42;
    project_row.number_of_participants = 9;
    app.repository.save_project(&project_row).await.unwrap();

    let repaired = app
        .services
        .projects
        .reconcile_project(project.id)
        .await
        .unwrap();
    assert_eq!(repaired.number_of_files, 1);
    assert_eq!(repaired.number_of_participants, 1);
    assert_eq!(repaired.last_modified_file_id, Some(file.id));

    let task = app.task(task.id).await;
    assert_eq!(task.number_of_files, 1);
    assert_eq!(task.last_modified_file_id, Some(file.id));
}

#[tokio::test]
async fn test_project_info_orders_tasks_by_activity() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let quiet = app.create_task(project.id, "Quiet", app.admin, vec![]).await;
    tick().await;
    let busy = app.create_task(project.id, "Busy", app.admin, vec![]).await;
    tick().await;
    let idle = app.create_task(project.id, "Idle", app.admin, vec![]).await;
    tick().await;
    app.create_file(busy.id, "b.txt", "b\n").await;
    tick().await;
    app.create_file(quiet.id, "q.txt", "q\n").await;

    let info = app.services.projects.project_info(project.id).await.unwrap();
    let order: Vec<_> = info.tasks.iter().map(|t| t.id).collect();
    assert_eq!(order, vec![quiet.id, busy.id, idle.id]);
}

#[tokio::test]
async fn test_participated_projects_lists_involvement_newest_first() {
    let app = helpers::TestApp::new().await;
    let member = UserId::new();

    let first = app.create_project("First").await;
    app.create_task(first.id, "Draft", app.admin, vec![member])
        .await;
    tick().await;
    let second = app.create_project("Second").await;
    app.create_task(second.id, "Draft", member, vec![]).await;
    tick().await;
    app.create_project("Unrelated").await;

    let listed = app
        .services
        .projects
        .participated_projects(member)
        .await
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let own = app
        .services
        .projects
        .participated_projects(app.admin)
        .await
        .unwrap();
    assert_eq!(own.len(), 3);
}

#[tokio::test]
async fn test_create_task_in_missing_project_fails() {
    let app = helpers::TestApp::new().await;
    let err = app
        .services
        .tasks
        .create_task(
            &app.admin_ctx(),
            docflow_core::types::ProjectId::new(),
            docflow_service::task::CreateTaskRequest {
                name: "Orphan".to_string(),
                description: String::new(),
                administrator_id: None,
                participant_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

/// One mutation in a generated workload. Indices pick among live tasks,
/// live files, or the fixed user pool, modulo their current size.
#[derive(Debug, Clone)]
enum Step {
    CreateTask { admin: usize, participants: Vec<usize> },
    DeleteTask(usize),
    CreateFile(usize),
    DeleteFile(usize),
    AddVersion(usize),
    AddParticipant { task: usize, user: usize },
    RemoveParticipant { task: usize, user: usize },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => (any::<usize>(), prop::collection::vec(any::<usize>(), 0..4))
            .prop_map(|(admin, participants)| Step::CreateTask { admin, participants }),
        1 => any::<usize>().prop_map(Step::DeleteTask),
        3 => any::<usize>().prop_map(Step::CreateFile),
        1 => any::<usize>().prop_map(Step::DeleteFile),
        2 => any::<usize>().prop_map(Step::AddVersion),
        2 => (any::<usize>(), any::<usize>())
            .prop_map(|(task, user)| Step::AddParticipant { task, user }),
        2 => (any::<usize>(), any::<usize>())
            .prop_map(|(task, user)| Step::RemoveParticipant { task, user }),
    ]
}

/// What the test believes a task looks like.
struct TaskModel {
    id: TaskId,
    administrator: UserId,
    participants: HashSet<UserId>,
}

/// Test-side bookkeeping, updated alongside every service call.
#[derive(Default)]
struct ProjectModel {
    tasks: Vec<TaskModel>,
    files: Vec<(FileId, TaskId)>,
    uploads: usize,
}

impl ProjectModel {
    fn expected_participants(&self, project_admin: UserId) -> u64 {
        let mut users = HashSet::from([project_admin]);
        for task in &self.tasks {
            users.insert(task.administrator);
            users.extend(task.participants.iter().copied());
        }
        users.len() as u64
    }
}

async fn run_workload(steps: Vec<Step>) {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Generated").await;
    let ctx = app.admin_ctx();
    let pool: Vec<UserId> = std::iter::once(app.admin)
        .chain((0..4).map(|_| UserId::new()))
        .collect();
    let mut model = ProjectModel::default();

    for step in steps {
        match step {
            Step::CreateTask { admin, participants } => {
                let administrator = pool[admin % pool.len()];
                let participants: Vec<UserId> =
                    participants.iter().map(|i| pool[i % pool.len()]).collect();
                let name = format!("Task {}", model.tasks.len());
                let task = app
                    .create_task(project.id, &name, administrator, participants.clone())
                    .await;
                model.tasks.push(TaskModel {
                    id: task.id,
                    administrator,
                    participants: participants
                        .into_iter()
                        .filter(|user| *user != administrator)
                        .collect(),
                });
            }
            Step::DeleteTask(i) if !model.tasks.is_empty() => {
                let task = model.tasks.remove(i % model.tasks.len());
                app.services.tasks.delete_task(&ctx, task.id).await.unwrap();
                model.files.retain(|(_, task_id)| *task_id != task.id);
            }
            Step::CreateFile(i) if !model.tasks.is_empty() => {
                let task_id = model.tasks[i % model.tasks.len()].id;
                model.uploads += 1;
                let name = format!("f{}.txt", model.uploads);
                let file = app.create_file(task_id, &name, "first\n").await;
                model.files.push((file.id, task_id));
            }
            Step::DeleteFile(i) if !model.files.is_empty() => {
                let (file_id, _) = model.files.remove(i % model.files.len());
                app.services.files.delete_file(&ctx, file_id).await.unwrap();
            }
            Step::AddVersion(i) if !model.files.is_empty() => {
                let (file_id, _) = model.files[i % model.files.len()];
                model.uploads += 1;
                let body = format!("first\nedit {}\n", model.uploads);
                app.add_version(file_id, &format!("1.{}", model.uploads), &body)
                    .await;
            }
            Step::AddParticipant { task, user } if !model.tasks.is_empty() => {
                let index = task % model.tasks.len();
                let entry = &mut model.tasks[index];
                let user = pool[user % pool.len()];
                app.services
                    .tasks
                    .add_participant(&ctx, entry.id, user)
                    .await
                    .unwrap();
                if user != entry.administrator {
                    entry.participants.insert(user);
                }
            }
            Step::RemoveParticipant { task, user } if !model.tasks.is_empty() => {
                let index = task % model.tasks.len();
                let entry = &mut model.tasks[index];
                let user = pool[user % pool.len()];
                app.services
                    .tasks
                    .remove_participant(&ctx, entry.id, user)
                    .await
                    .unwrap();
                entry.participants.remove(&user);
            }
            // Nothing live to act on yet.
            _ => continue,
        }

        app.assert_converged(project.id).await;
        let stored = app.project(project.id).await;
        assert_eq!(stored.number_of_tasks, model.tasks.len() as u64);
        assert_eq!(stored.number_of_files, model.files.len() as u64);
        assert_eq!(
            stored.number_of_participants,
            model.expected_participants(app.admin)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_random_workloads_keep_summaries_converged(
        steps in prop::collection::vec(step_strategy(), 1..40)
    ) {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
            .block_on(run_workload(steps));
    }
}
