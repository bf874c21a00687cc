//! File version history queries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::traits::ContentExtractor;
use docflow_core::types::{FileId, VersionId};
use docflow_database::AggregateRepository;
use docflow_entity::{Difference, Version};

/// A version's edit script together with the text it applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDiff {
    /// The version described.
    pub version_id: VersionId,
    /// The version it was diffed against, if any.
    pub previous_version_id: Option<VersionId>,
    /// Hunks turning the previous content into this version's content.
    pub differences: Vec<Difference>,
    /// Lines of this version.
    pub new_lines: Vec<String>,
    /// Lines of the previous version.
    pub previous_lines: Option<Vec<String>>,
}

/// Reads file version history.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// Aggregate repository.
    repository: Arc<dyn AggregateRepository>,
    /// Content extractor for rendering lines.
    extractor: Arc<dyn ContentExtractor>,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        repository: Arc<dyn AggregateRepository>,
        extractor: Arc<dyn ContentExtractor>,
    ) -> Self {
        Self {
            repository,
            extractor,
        }
    }

    /// Lists all versions of a file, newest first.
    pub async fn list_versions(&self, file_id: FileId) -> AppResult<Vec<Version>> {
        let file = self.repository.load_file(file_id).await?;
        Ok(file.versions_newest_first().into_iter().cloned().collect())
    }

    /// Returns the differences stored with a version plus the content on
    /// both sides of them.
    pub async fn version_diff(
        &self,
        file_id: FileId,
        version_id: VersionId,
    ) -> AppResult<VersionDiff> {
        let file = self.repository.load_file(file_id).await?;
        let history = file.versions_newest_first();
        let position = history
            .iter()
            .position(|v| v.id == version_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version_id} not found in file {file_id}"))
            })?;

        let version = history[position];
        let previous = history.get(position + 1).copied();

        let new_lines = self.extractor.extract_lines(&version.content)?;
        let previous_lines = previous
            .map(|v| self.extractor.extract_lines(&v.content))
            .transpose()?;

        debug!(
            file_id = %file_id,
            version_id = %version_id,
            hunks = version.differences.len(),
            "Version diff loaded"
        );

        Ok(VersionDiff {
            version_id,
            previous_version_id: previous.map(|v| v.id),
            differences: version.differences.clone(),
            new_lines,
            previous_lines,
        })
    }
}
