//! # docflow-core
//!
//! Core crate for DocFlow. Contains the unified error system, configuration
//! schemas, typed identifiers, domain events, and the collaborator traits
//! the rest of the workspace is written against.
//!
//! This crate has **no** internal dependencies on other DocFlow crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
