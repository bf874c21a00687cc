//! File workflow services — creation, versioning, confirmation, deletion.

pub mod factory;
pub mod service;
pub mod version;

pub use factory::{NewVersion, VersionFactory};
pub use service::{AddVersionRequest, CreateFileRequest, FileService};
pub use version::{VersionDiff, VersionService};
