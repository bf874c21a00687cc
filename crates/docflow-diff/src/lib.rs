//! # docflow-diff
//!
//! Turns raw file content into text lines and computes minimal line edit
//! scripts between revisions.
//!
//! - [`TextExtractor`]: the default [`ContentExtractor`], decoding UTF-8 and
//!   UTF-16 text and rejecting binary content.
//! - [`diff`]: a total, pure LCS diff over two line sequences.
//! - [`DiffEngine`]: extraction plus diffing for raw contents.
//! - [`apply`]: replays an edit script to rebuild the new revision.
//!
//! [`ContentExtractor`]: docflow_core::traits::ContentExtractor

pub mod engine;
pub mod error;
pub mod extractor;
pub mod patch;

pub use engine::{DiffEngine, diff};
pub use error::ExtractionError;
pub use extractor::TextExtractor;
pub use patch::apply;
