//! Domain events emitted by DocFlow operations.
//!
//! Events are published through the event bus after the triggering action
//! has persisted its change, and consumed by the aggregate consistency
//! handlers. Every payload carries the ids of the aggregates it touches so
//! handlers never need to resolve references lazily.

pub mod file;
pub mod task;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use file::FileEvent;
pub use task::TaskEvent;

use crate::types::{ProjectId, UserId};

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<UserId>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A file- or version-related event.
    File(FileEvent),
    /// A task- or participant-related event.
    Task(TaskEvent),
}

/// Discriminant of an event, used as the registry key for handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A file was created together with its first version.
    FileCreated,
    /// A file and all its versions were deleted.
    FileDeleted,
    /// A new version was appended to an existing file.
    VersionCreated,
    /// A task was created inside a project.
    TaskCreated,
    /// A task and all its files were deleted.
    TaskDeleted,
    /// A user joined a task.
    ParticipantAdded,
    /// A user left a task.
    ParticipantRemoved,
}

impl EventKind {
    /// Returns the string name of this event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileCreated => "file_created",
            Self::FileDeleted => "file_deleted",
            Self::VersionCreated => "version_created",
            Self::TaskCreated => "task_created",
            Self::TaskDeleted => "task_deleted",
            Self::ParticipantAdded => "participant_added",
            Self::ParticipantRemoved => "participant_removed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<UserId>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Create a new file domain event.
    pub fn file(actor_id: Option<UserId>, event: FileEvent) -> Self {
        Self::new(actor_id, EventPayload::File(event))
    }

    /// Create a new task domain event.
    pub fn task(actor_id: Option<UserId>, event: TaskEvent) -> Self {
        Self::new(actor_id, EventPayload::Task(event))
    }

    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match &self.payload {
            EventPayload::File(event) => event.kind(),
            EventPayload::Task(event) => event.kind(),
        }
    }

    /// The project whose aggregates this event affects.
    pub fn project_id(&self) -> ProjectId {
        match &self.payload {
            EventPayload::File(event) => event.project_id(),
            EventPayload::Task(event) => event.project_id(),
        }
    }
}
