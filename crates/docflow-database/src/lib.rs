//! # docflow-database
//!
//! Persistence for DocFlow aggregates. [`AggregateRepository`] is the
//! collaborator the services and consistency handlers are written against;
//! [`MemoryRepository`] is the in-process implementation backed by
//! concurrent maps.

pub mod memory;
pub mod repository;

pub use memory::MemoryRepository;
pub use repository::AggregateRepository;
