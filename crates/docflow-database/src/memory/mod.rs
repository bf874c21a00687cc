//! In-memory repository backend.

pub mod store;

pub use store::MemoryRepository;
