//! Content extraction configuration.

use serde::{Deserialize, Serialize};

/// Limits applied when turning uploaded bytes into text lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Largest accepted content, in bytes. Larger uploads are rejected
    /// before decoding.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

fn default_max_content_bytes() -> usize {
    16 * 1024 * 1024
}
