//! Version construction from new content.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use sha2::{Digest, Sha256};

use docflow_core::result::AppResult;
use docflow_core::traits::ExtractedContent;
use docflow_core::types::{FileId, UserId, VersionId};
use docflow_diff::{DiffEngine, diff};
use docflow_entity::{Difference, FileMetadata, Version};

/// User-supplied part of a new version.
#[derive(Debug, Clone)]
pub struct NewVersion {
    /// Raw content.
    pub content: Bytes,
    /// Version label shown to users.
    pub version_string: String,
    /// Description of the change.
    pub message: String,
    /// Who saved it.
    pub author_id: UserId,
}

/// Builds versions, diffing new content against the file's latest version
/// (or against empty content for the first one).
#[derive(Debug, Clone)]
pub struct VersionFactory {
    engine: Arc<DiffEngine>,
}

impl VersionFactory {
    /// Creates a new factory.
    pub fn new(engine: Arc<DiffEngine>) -> Self {
        Self { engine }
    }

    /// First version of a new file, together with the decoded content. The
    /// file name refines the detected content type.
    pub fn initial_version(
        &self,
        file_id: FileId,
        file_name: &str,
        input: NewVersion,
    ) -> AppResult<(ExtractedContent, Version)> {
        let extracted = self
            .engine
            .extractor()
            .extract(&input.content, Some(file_name))?;
        let differences = diff::<String>(&[], &extracted.lines);
        Ok((extracted, build(file_id, input, differences)))
    }

    /// Next version of an existing file.
    pub fn next_version(&self, file: &FileMetadata, input: NewVersion) -> AppResult<Version> {
        let differences = match file.latest_version() {
            Some(latest) => self
                .engine
                .differences_between(&latest.content, &input.content)?,
            None => self.engine.differences_for_new_file(&input.content)?,
        };
        Ok(build(file.id, input, differences))
    }
}

fn build(file_id: FileId, input: NewVersion, differences: Vec<Difference>) -> Version {
    Version {
        id: VersionId::new(),
        file_id,
        save_date: Utc::now(),
        version_string: input.version_string,
        message: input.message,
        author_id: input.author_id,
        checksum: checksum(&input.content),
        content: input.content,
        differences,
    }
}

/// Hex-encoded SHA-256 of `content`.
pub fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
