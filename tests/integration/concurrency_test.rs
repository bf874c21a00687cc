//! Integration tests for concurrent writers converging on correct summaries.

mod helpers;

use bytes::Bytes;
use futures::future::join_all;

use docflow_core::types::UserId;
use docflow_service::context::RequestContext;
use docflow_service::file::{AddVersionRequest, CreateFileRequest};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_uploads_to_one_task_converge() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let services = app.services.clone();
            let ctx = RequestContext::new(UserId::new());
            tokio::spawn(async move {
                services
                    .files
                    .create_file(
                        &ctx,
                        task.id,
                        CreateFileRequest {
                            name: format!("part-{i}.txt"),
                            description: String::new(),
                            content: Bytes::from(format!("part {i}\n")),
                            version_string: "1.0".to_string(),
                            message: String::new(),
                        },
                    )
                    .await
            })
        })
        .collect();

    for result in join_all(handles).await {
        result.expect("task panicked").expect("create file");
    }

    let task = app.task(task.id).await;
    assert_eq!(task.number_of_files, 16);
    let project_row = app.project(project.id).await;
    assert_eq!(project_row.number_of_files, 16);
    assert_eq!(project_row.last_modified_file_id, task.last_modified_file_id);
    app.assert_converged(project.id).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_work_across_tasks_converges() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;

    let mut tasks = Vec::new();
    for i in 0..4 {
        tasks.push(
            app.create_task(project.id, &format!("Task {i}"), UserId::new(), vec![])
                .await,
        );
    }
    let mut files = Vec::new();
    for task in &tasks {
        files.push(app.create_file(task.id, "seed.txt", "seed\n").await);
    }

    let mut handles = Vec::new();
    for (task, file) in tasks.iter().zip(&files) {
        let services = app.services.clone();
        let (task_id, file_id) = (task.id, file.id);
        handles.push(tokio::spawn(async move {
            let ctx = RequestContext::new(UserId::new());
            services
                .tasks
                .add_participant(&ctx, task_id, ctx.user_id)
                .await?;
            services
                .files
                .add_version(
                    &ctx,
                    file_id,
                    AddVersionRequest {
                        content: Bytes::from_static(b"seed\ngrown\n"),
                        version_string: "1.1".to_string(),
                        message: String::new(),
                    },
                )
                .await?;
            services
                .files
                .create_file(
                    &ctx,
                    task_id,
                    CreateFileRequest {
                        name: "extra.txt".to_string(),
                        description: String::new(),
                        content: Bytes::from_static(b"extra\n"),
                        version_string: "1.0".to_string(),
                        message: String::new(),
                    },
                )
                .await
        }));
    }

    for result in join_all(handles).await {
        result.expect("task panicked").expect("workflow");
    }

    let project_row = app.project(project.id).await;
    assert_eq!(project_row.number_of_tasks, 4);
    assert_eq!(project_row.number_of_files, 8);
    // Administrator, four task administrators, four new participants.
    assert_eq!(project_row.number_of_participants, 9);
    app.assert_converged(project.id).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_uploads_racing_task_deletion_converge() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let kept = app.create_task(project.id, "Kept", app.admin, vec![]).await;
    let doomed = app.create_task(project.id, "Doomed", app.admin, vec![]).await;
    app.create_file(doomed.id, "old.txt", "old\n").await;

    let uploads: Vec<_> = (0..8)
        .map(|i| {
            let services = app.services.clone();
            let ctx = app.admin_ctx();
            let task_id = kept.id;
            tokio::spawn(async move {
                services
                    .files
                    .create_file(
                        &ctx,
                        task_id,
                        CreateFileRequest {
                            name: format!("new-{i}.txt"),
                            description: String::new(),
                            content: Bytes::from(format!("new {i}\n")),
                            version_string: "1.0".to_string(),
                            message: String::new(),
                        },
                    )
                    .await
                    .map(|_| ())
            })
        })
        .collect();

    let deletion = {
        let services = app.services.clone();
        let ctx = app.admin_ctx();
        let task_id = doomed.id;
        tokio::spawn(async move { services.tasks.delete_task(&ctx, task_id).await })
    };

    for result in join_all(uploads).await {
        result.expect("task panicked").expect("upload");
    }
    deletion.await.expect("task panicked").expect("delete task");

    let project_row = app.project(project.id).await;
    assert_eq!(project_row.number_of_tasks, 1);
    assert_eq!(project_row.number_of_files, 8);
    app.assert_converged(project.id).await;
}
