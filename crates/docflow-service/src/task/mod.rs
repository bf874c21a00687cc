//! Task management.

pub mod service;

pub use service::{CreateTaskRequest, TaskService};
