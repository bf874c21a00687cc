//! Content extractor trait: raw bytes to ordered text lines.

use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Text recovered from raw file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Detected MIME type of the content.
    pub content_type: String,
    /// Name of the encoding the bytes were decoded from.
    pub encoding: String,
    /// The content split into lines, without line terminators.
    pub lines: Vec<String>,
}

/// Turns raw bytes into an ordered sequence of text lines.
///
/// Implementations fail with an [`ErrorKind::Extraction`] error when the
/// content is unreadable or its type cannot be detected.
///
/// [`ErrorKind::Extraction`]: crate::error::ErrorKind::Extraction
pub trait ContentExtractor: Send + Sync + std::fmt::Debug + 'static {
    /// Decode `content`, using `name_hint` (a file name) to refine the
    /// detected content type.
    fn extract(&self, content: &[u8], name_hint: Option<&str>) -> AppResult<ExtractedContent>;

    /// Decode `content` and return only its lines.
    fn extract_lines(&self, content: &[u8]) -> AppResult<Vec<String>> {
        self.extract(content, None).map(|extracted| extracted.lines)
    }
}
