//! Project management and read models.

pub mod service;

pub use service::{CreateProjectRequest, ProjectService};
