//! File version entity.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docflow_core::types::{FileId, UserId, VersionId};

use crate::difference::Difference;

/// An immutable revision of a file, with the edit script that leads to it
/// from the previous revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    /// Unique version identifier.
    pub id: VersionId,
    /// The file this version belongs to.
    pub file_id: FileId,
    /// When this version was saved.
    pub save_date: DateTime<Utc>,
    /// User-facing version label (e.g. `"1.0"`).
    pub version_string: String,
    /// Commit-style message describing the change.
    pub message: String,
    /// User who saved this version.
    pub author_id: UserId,
    /// Raw content of this revision.
    pub content: Bytes,
    /// Hex-encoded SHA-256 of `content`.
    pub checksum: String,
    /// Hunks turning the previous revision into this one.
    pub differences: Vec<Difference>,
}

impl Version {
    /// Size of the raw content in bytes.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}
