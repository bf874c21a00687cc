//! Core traits defined in `docflow-core` and implemented by other crates.

pub mod extractor;

pub use extractor::{ContentExtractor, ExtractedContent};
