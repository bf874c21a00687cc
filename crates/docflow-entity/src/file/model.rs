//! File metadata aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::types::{FileId, TaskId};

use super::state::ConfirmationState;
use crate::version::Version;

/// A versioned document stored under a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Unique file identifier.
    pub id: FileId,
    /// Display name (including extension).
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// The task owning this file.
    pub task_id: TaskId,
    /// Whether the task administrator confirmed the file.
    pub confirmed: bool,
    /// Whether confirmation was requested.
    pub marked_to_confirm: bool,
    /// MIME type detected from the initial content.
    pub content_type: String,
    /// All versions in append order.
    pub versions: Vec<Version>,
}

impl FileMetadata {
    /// Create a draft file with its initial version.
    pub fn new(
        id: FileId,
        task_id: TaskId,
        name: impl Into<String>,
        description: impl Into<String>,
        content_type: impl Into<String>,
        initial_version: Version,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            task_id,
            confirmed: false,
            marked_to_confirm: false,
            content_type: content_type.into(),
            versions: vec![initial_version],
        }
    }

    /// Current state in the confirmation workflow.
    pub fn state(&self) -> ConfirmationState {
        ConfirmationState::from_flags(self.confirmed, self.marked_to_confirm)
    }

    /// Request confirmation of a draft file.
    pub fn mark_to_confirm(&mut self) -> AppResult<()> {
        match self.state() {
            ConfirmationState::Draft => {
                self.marked_to_confirm = true;
                Ok(())
            }
            other => Err(AppError::validation(format!(
                "File {} cannot be marked to confirm from state '{other}'",
                self.id
            ))),
        }
    }

    /// Confirm a file that was marked to confirm.
    pub fn confirm(&mut self) -> AppResult<()> {
        match self.state() {
            ConfirmationState::MarkedToConfirm => {
                self.confirmed = true;
                Ok(())
            }
            other => Err(AppError::validation(format!(
                "File {} cannot be confirmed from state '{other}'",
                self.id
            ))),
        }
    }

    /// The most recently saved version, if any remain.
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.iter().max_by_key(|v| v.save_date)
    }

    /// Save date of the latest version.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.latest_version().map(|v| v.save_date)
    }

    /// Ordering key used to pick a "last modified file": latest save date
    /// first, file id to break ties between equal dates.
    pub fn recency_key(&self) -> Option<(DateTime<Utc>, FileId)> {
        self.last_modified().map(|date| (date, self.id))
    }

    /// Versions ordered newest first. Equal save dates keep the later
    /// appended version first, matching [`latest_version`](Self::latest_version).
    pub fn versions_newest_first(&self) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self.versions.iter().rev().collect();
        versions.sort_by(|a, b| b.save_date.cmp(&a.save_date));
        versions
    }

    /// Lightweight summary for listings.
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id,
            name: self.name.clone(),
            task_id: self.task_id,
            content_type: self.content_type.clone(),
            state: self.state(),
            last_modified: self.last_modified(),
        }
    }
}

/// File listing entry without version payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// File identifier.
    pub id: FileId,
    /// Display name.
    pub name: String,
    /// Owning task.
    pub task_id: TaskId,
    /// MIME type.
    pub content_type: String,
    /// Confirmation workflow state.
    pub state: ConfirmationState,
    /// Save date of the latest version.
    pub last_modified: Option<DateTime<Utc>>,
}
