//! Integration tests for the file workflow and version history.

mod helpers;

use std::time::Duration;

use bytes::Bytes;

use docflow_core::error::ErrorKind;
use docflow_core::types::{FileId, VersionId};
use docflow_entity::{ConfirmationState, DifferenceType};
use docflow_service::file::CreateFileRequest;

#[tokio::test]
async fn test_create_file_stores_initial_version() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;

    let file = app.create_file(task.id, "intro.txt", "Intro\nbody\n").await;

    assert_eq!(file.state(), ConfirmationState::Draft);
    assert_eq!(file.content_type, "text/plain");
    assert_eq!(file.versions.len(), 1);

    let initial = &file.versions[0];
    assert_eq!(initial.author_id, app.admin);
    assert_eq!(initial.checksum.len(), 64);
    assert_eq!(initial.differences.len(), 1);
    assert_eq!(
        initial.differences[0].difference_type(),
        DifferenceType::Insert
    );
}

#[tokio::test]
async fn test_binary_content_is_rejected() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;

    let err = app
        .services
        .files
        .create_file(
            &app.admin_ctx(),
            task.id,
            CreateFileRequest {
                name: "image.bin".to_string(),
                description: String::new(),
                content: Bytes::from_static(&[0x00, 0x9F, 0x92, 0x96, 0x00]),
                version_string: "1.0".to_string(),
                message: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Extraction);

    // Nothing was stored, so the task summary is untouched.
    assert_eq!(app.task(task.id).await.number_of_files, 0);
}

#[tokio::test]
async fn test_empty_file_name_is_rejected() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;

    let err = app
        .services
        .files
        .create_file(
            &app.admin_ctx(),
            task.id,
            CreateFileRequest {
                name: "   ".to_string(),
                description: String::new(),
                content: Bytes::from_static(b"text"),
                version_string: "1.0".to_string(),
                message: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_confirmation_workflow() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "a\n").await;
    let ctx = app.admin_ctx();

    let err = app.services.files.confirm(&ctx, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let marked = app
        .services
        .files
        .mark_to_confirm(&ctx, file.id)
        .await
        .unwrap();
    assert_eq!(marked.state(), ConfirmationState::MarkedToConfirm);

    let confirmed = app.services.files.confirm(&ctx, file.id).await.unwrap();
    assert_eq!(confirmed.state(), ConfirmationState::Confirmed);
    assert_eq!(confirmed.versions.len(), 1);

    let err = app
        .services
        .files
        .mark_to_confirm(&ctx, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_versions_are_listed_newest_first() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "one\n").await;

    let mut expected = vec![file.versions[0].id];
    for (label, body) in [("1.1", "one\ntwo\n"), ("1.2", "one\ntwo\nthree\n")] {
        tokio::time::sleep(Duration::from_millis(5)).await;
        expected.push(app.add_version(file.id, label, body).await.id);
    }
    expected.reverse();

    let listed = app.services.versions.list_versions(file.id).await.unwrap();
    let ids: Vec<VersionId> = listed.iter().map(|v| v.id).collect();
    assert_eq!(ids, expected);
    assert_eq!(listed[0].version_string, "1.2");
}

#[tokio::test]
async fn test_version_diff_rebuilds_new_content() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app
        .create_file(task.id, "a.txt", "alpha\nbeta\ngamma\n")
        .await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let version = app
        .add_version(file.id, "1.1", "alpha\nBETA\ngamma\ndelta\n")
        .await;

    let diff = app
        .services
        .versions
        .version_diff(file.id, version.id)
        .await
        .unwrap();
    assert_eq!(diff.previous_version_id, Some(file.versions[0].id));
    assert_eq!(diff.new_lines, vec!["alpha", "BETA", "gamma", "delta"]);

    let previous = diff.previous_lines.expect("previous content");
    assert_eq!(previous, vec!["alpha", "beta", "gamma"]);
    let rebuilt = docflow_diff::apply(&previous, &diff.new_lines, &diff.differences).unwrap();
    assert_eq!(rebuilt, diff.new_lines);
}

#[tokio::test]
async fn test_initial_version_diff_has_no_previous() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "x\ny\n").await;

    let diff = app
        .services
        .versions
        .version_diff(file.id, file.versions[0].id)
        .await
        .unwrap();
    assert_eq!(diff.previous_version_id, None);
    assert!(diff.previous_lines.is_none());
    assert_eq!(diff.new_lines, vec!["x", "y"]);
}

#[tokio::test]
async fn test_unknown_file_and_version_are_not_found() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "a\n").await;

    let err = app
        .services
        .files
        .file_info(FileId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .services
        .versions
        .version_diff(file.id, VersionId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_confirmed_file_can_be_deleted() {
    let app = helpers::TestApp::new().await;
    let project = app.create_project("Thesis").await;
    let task = app.create_task(project.id, "Draft", app.admin, vec![]).await;
    let file = app.create_file(task.id, "a.txt", "a\n").await;
    let ctx = app.admin_ctx();

    app.services
        .files
        .mark_to_confirm(&ctx, file.id)
        .await
        .unwrap();
    app.services.files.confirm(&ctx, file.id).await.unwrap();
    app.services.files.delete_file(&ctx, file.id).await.unwrap();

    let err = app.services.files.file_info(file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.project(project.id).await.number_of_files, 0);
}
