//! # docflow-service
//!
//! Business logic service layer for DocFlow. Services implement the user
//! actions (create, edit, confirm, delete) and publish a domain event after
//! each persisted change; the [`ConsistencyMaintainer`] reacts to those
//! events and keeps the denormalized Task and Project summaries correct.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references. [`AppServices`] wires the
//! whole graph for a given repository.

pub mod consistency;
pub mod context;
pub mod file;
pub mod project;
pub mod retry;
pub mod state;
pub mod task;

pub use consistency::ConsistencyMaintainer;
pub use context::RequestContext;
pub use file::{FileService, VersionFactory, VersionService};
pub use project::ProjectService;
pub use state::AppServices;
pub use task::TaskService;
