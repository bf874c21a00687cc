//! File domain entities.

pub mod model;
pub mod state;

pub use model::{FileMetadata, FileSummary};
pub use state::ConfirmationState;
