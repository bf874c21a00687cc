//! Extraction error type.
//!
//! Converted into `AppError` with [`ErrorKind::Extraction`] so callers of
//! file and version creation see a single error category.
//!
//! [`ErrorKind::Extraction`]: docflow_core::error::ErrorKind::Extraction

use docflow_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Reasons raw content cannot be turned into text lines.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Content exceeds the configured size limit.
    #[error("Content is {size} bytes, exceeding limit of {limit} bytes")]
    TooLarge {
        /// Actual content size.
        size: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// Content looks binary (contains NUL characters).
    #[error("Content type could not be detected: content appears to be binary")]
    Binary,

    /// Content is not valid text in the detected encoding.
    #[error("Content is not valid {encoding}: {reason}")]
    InvalidEncoding {
        /// Encoding the content was decoded as.
        encoding: &'static str,
        /// Decoder message.
        reason: String,
    },
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::with_source(ErrorKind::Extraction, err.to_string(), err)
    }
}
