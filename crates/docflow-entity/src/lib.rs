//! # docflow-entity
//!
//! Domain entity models for DocFlow. Every struct in this crate is either
//! an aggregate snapshot persisted by the repository (`Project`, `Task`,
//! `FileMetadata`) or an immutable value owned by one (`Version`,
//! `Difference`). Cross-aggregate references are plain ids.

pub mod difference;
pub mod file;
pub mod project;
pub mod task;
pub mod version;

pub use difference::{Difference, DifferenceType};
pub use file::{ConfirmationState, FileMetadata, FileSummary};
pub use project::{Project, ProjectInfo, ProjectSummary};
pub use task::Task;
pub use version::Version;
